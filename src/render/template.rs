//! 简历模板渲染
//!
//! `render_html` 是纯函数：同一份记录渲染出逐字节相同的 HTML，
//! 不访问网络、时钟或随机数，支持黄金样本测试。

use std::fs;
use std::path::Path;

use handlebars::Handlebars;
use tracing::info;

use crate::error::{AgentError, Result};
use crate::models::ResumeRecord;

/// 内嵌的简历模板（A4 纸面排版，打印友好）
const RESUME_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<title>{{name}} - {{title}}</title>
<style>
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body {
    font-family: "PingFang SC", "Microsoft YaHei", "Noto Sans CJK SC", sans-serif;
    font-size: 13px; line-height: 1.55; color: #2c3e50;
    width: 210mm; margin: 0 auto; padding: 14mm 16mm;
    background: #ffffff;
  }
  header { border-bottom: 2px solid #2c3e50; padding-bottom: 10px; margin-bottom: 14px; }
  h1 { font-size: 24px; display: inline-block; }
  .job-title { font-size: 15px; color: #2980b9; margin-left: 12px; }
  .contact { margin-top: 6px; color: #7f8c8d; font-size: 12px; }
  .contact span { margin-right: 14px; }
  h2 {
    font-size: 15px; color: #2980b9; border-left: 4px solid #2980b9;
    padding-left: 8px; margin: 14px 0 8px;
  }
  .summary { text-align: justify; }
  .skills span {
    display: inline-block; background: #ecf0f1; border-radius: 3px;
    padding: 2px 8px; margin: 2px 4px 2px 0; font-size: 12px;
  }
  .project { margin-bottom: 10px; }
  .project-head { display: flex; justify-content: space-between; }
  .project-name { font-weight: bold; }
  .project-role { color: #7f8c8d; margin-left: 8px; }
  .project-date { color: #95a5a6; font-size: 12px; }
  ul { padding-left: 18px; margin-top: 4px; }
  li { margin-bottom: 2px; text-align: justify; }
  .matched { color: #27ae60; font-size: 12px; margin-top: 2px; }
  .edu { display: flex; justify-content: space-between; margin-bottom: 4px; }
  .edu-honors { color: #7f8c8d; font-size: 12px; }
</style>
</head>
<body>
<header>
  <h1>{{name}}</h1><span class="job-title">{{title}}</span>
  <div class="contact">{{#each contact}}<span>{{@key}}: {{this}}</span>{{/each}}</div>
</header>

<h2>个人总结</h2>
<p class="summary">{{summary}}</p>

<h2>技术栈</h2>
<div class="skills">{{#each skills}}<span>{{this}}</span>{{/each}}</div>

<h2>项目经历</h2>
{{#each experience}}
<div class="project">
  <div class="project-head">
    <div><span class="project-name">{{project_name}}</span><span class="project-role">{{role}}</span></div>
    <span class="project-date">{{#if start_date}}{{start_date}}{{/if}}{{#if end_date}} - {{end_date}}{{/if}}</span>
  </div>
  <ul>
  {{#each optimized_bullets}}<li>{{this}}</li>
  {{/each}}</ul>
  {{#if matched_skills}}<div class="matched">关键技术: {{#each matched_skills}}{{this}}{{#unless @last}} / {{/unless}}{{/each}}</div>{{/if}}
</div>
{{/each}}

<h2>教育背景</h2>
{{#each education}}
<div class="edu">
  <div>{{school}} · {{degree}} · {{major}}{{#if honors}}<span class="edu-honors">（{{#each honors}}{{this}}{{#unless @last}}、{{/unless}}{{/each}}）</span>{{/if}}</div>
  <span class="project-date">{{start_year}} - {{end_year}}</span>
</div>
{{/each}}

<!-- match_score: {{match_score}} -->
</body>
</html>
"#;

/// 模板注册名
const TEMPLATE_NAME: &str = "resume_v1";

/// 将简历记录渲染为 HTML 字符串
///
/// 纯函数：相同输入必定产出逐字节相同的结果。
pub fn render_html(record: &ResumeRecord) -> Result<String> {
    let mut registry = Handlebars::new();
    registry
        .register_template_string(TEMPLATE_NAME, RESUME_TEMPLATE)
        .map_err(|e| AgentError::TemplateInit(Box::new(e)))?;

    let html = registry.render(TEMPLATE_NAME, record)?;
    Ok(html)
}

/// 渲染简历并写入目标路径，按需创建中间目录
pub fn save_html(record: &ResumeRecord, output_path: &Path) -> Result<()> {
    let html = render_html(record)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| AgentError::file(parent.display().to_string(), e))?;
        }
    }

    fs::write(output_path, html)
        .map_err(|e| AgentError::file(output_path.display().to_string(), e))?;

    info!("✨ 简历已渲染完成: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::tests::sample_resume;

    #[test]
    fn test_render_is_deterministic() {
        let record = sample_resume();
        let first = render_html(&record).unwrap();
        let second = render_html(&record).unwrap();
        assert_eq!(first, second, "相同记录必须渲染出逐字节相同的 HTML");
    }

    #[test]
    fn test_render_contains_record_content() {
        let record = sample_resume();
        let html = render_html(&record).unwrap();
        assert!(html.contains("张三"));
        assert!(html.contains("后端工程师"));
        assert!(html.contains("Kafka"));
        assert!(html.contains("订单队列服务优化"));
        assert!(html.contains("某大学"));
        assert!(html.contains("match_score: 85"));
    }

    #[test]
    fn test_render_escapes_html_in_fields() {
        let mut record = sample_resume();
        record.name = "<script>alert(1)</script>".to_string();
        let html = render_html(&record).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_save_html_creates_intermediate_dirs() {
        let record = sample_resume();
        let dir = std::env::temp_dir().join("resume_agent_test_save_html");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested/out.html");

        save_html(&record, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_html(&record).unwrap());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
