//! 应用编排层
//!
//! 读取输入 → 质量闭环打磨 → 渲染 HTML → 转换单页 PDF → 报告评分。
//! 输入检查在任何服务调用之前完成，避免白白消耗额度。

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::models::ResumeRecord;
use crate::render;
use crate::services::LlmService;
use crate::workflow::TailorFlow;

/// 应用主结构
pub struct App {
    config: Config,
    thoughts_path: String,
    jd_path: String,
    output_path: String,
}

impl App {
    /// 创建应用
    pub fn new(
        config: Config,
        thoughts_path: impl Into<String>,
        jd_path: impl Into<String>,
        output_path: impl Into<String>,
    ) -> Self {
        Self {
            config,
            thoughts_path: thoughts_path.into(),
            jd_path: jd_path.into(),
            output_path: output_path.into(),
        }
    }

    /// 运行完整流水线，返回最终简历记录
    pub async fn run(&self) -> Result<ResumeRecord> {
        log_startup(&self.config);

        // 输入检查先于一切服务调用
        info!(
            "📂 读取输入文件:\n  - 思绪: {}\n  - JD: {}",
            self.thoughts_path, self.jd_path
        );
        let thoughts = load_text(&self.thoughts_path)?;
        let jd = load_text(&self.jd_path)?;

        info!("🚀 正在将乱麻思绪转化为精美简历 (这可能需要 30-60 秒)...");
        let flow = TailorFlow::new(LlmService::new(&self.config));
        let resume = flow.run(&thoughts, &jd).await?;

        // HTML 产物
        let html_path = Path::new(&self.output_path);
        render::save_html(&resume, html_path)?;

        // 单页 PDF 产物：后端不可用时保留 HTML，不让整次运行失败
        let pdf_path = derive_pdf_path(&self.output_path);
        match render::html_to_pdf(html_path, &pdf_path).await {
            Ok(()) => {}
            Err(e @ AgentError::RenderBackend { .. }) => {
                warn!("⚠️ PDF 转换失败，仅保留 HTML 产物: {}", e);
            }
            Err(e) => return Err(e),
        }

        info!("🎯 简历与 JD 匹配度评分: {}", resume.match_score);
        Ok(resume)
    }
}

/// 读取输入文本，文件缺失或内容为空均视为输入错误
fn load_text(path: &str) -> Result<String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(AgentError::InputMissing {
            path: path.to_string(),
        });
    }

    let content = std::fs::read_to_string(p).map_err(|e| AgentError::file(path, e))?;
    if content.trim().is_empty() {
        return Err(AgentError::InputMissing {
            path: path.to_string(),
        });
    }
    Ok(content)
}

/// 从 HTML 输出路径派生 PDF 输出路径（同名换扩展名）
fn derive_pdf_path(output_path: &str) -> PathBuf {
    Path::new(output_path).with_extension("pdf")
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🤖 Resume Agent - 极速简历生成器");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📊 模型: {} @ {}", config.llm_model_name, config.llm_api_base_url);
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_pdf_path() {
        assert_eq!(
            derive_pdf_path("output/tailored_resume.html"),
            PathBuf::from("output/tailored_resume.pdf")
        );
    }

    #[test]
    fn test_load_text_missing_file() {
        let err = load_text("/nonexistent/raw_thoughts.md").unwrap_err();
        assert!(matches!(err, AgentError::InputMissing { .. }));
    }

    #[test]
    fn test_load_text_empty_file() {
        let path = std::env::temp_dir().join("resume_agent_test_empty.txt");
        std::fs::write(&path, "   \n\t  ").unwrap();

        let err = load_text(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AgentError::InputMissing { .. }));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_text_reads_content() {
        let path = std::env::temp_dir().join("resume_agent_test_content.txt");
        std::fs::write(&path, "5 年后端经验").unwrap();

        assert_eq!(load_text(path.to_str().unwrap()).unwrap(), "5 年后端经验");

        let _ = std::fs::remove_file(&path);
    }
}
