//! 应用程序错误类型
//!
//! 每一类失败都是致命的：不重试、不降级为"部分成功"，
//! 错误携带足够的上下文（原始响应片段、文件路径、阶段名）直接上抛。

use thiserror::Error;

/// 原始响应片段的最大长度（字符数），用于解码失败时的诊断
const SNIPPET_MAX_CHARS: usize = 500;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AgentError {
    /// LLM 服务不可达或返回传输层错误
    #[error("LLM 服务调用失败: {0}")]
    Service(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 响应体不是合法 JSON，或不符合目标 Schema
    #[error("结构化解码失败 (目标类型: {record})，AI 原始返回 (前 500 字符): {snippet}")]
    Decode {
        record: &'static str,
        snippet: String,
    },

    /// 待转换的 HTML 源文件不存在
    #[error("渲染源文件不存在: {path}")]
    RenderSourceNotFound { path: String },

    /// 无头浏览器启动或执行失败
    #[error("渲染后端执行失败: {detail}（提示: {hint}）")]
    RenderBackend { hint: String, detail: String },

    /// 输入文件缺失或内容为空
    #[error("输入文件缺失或为空: {path}")]
    InputMissing { path: String },

    /// 环境变量缺失
    #[error("环境变量 {var} 未设置")]
    Config { var: String },

    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 模板注册失败
    #[error("模板注册失败: {0}")]
    TemplateInit(#[from] Box<handlebars::TemplateError>),

    /// 模板渲染失败
    #[error("模板渲染失败: {0}")]
    Template(#[from] handlebars::RenderError),
}

// ========== 便捷构造函数 ==========

impl AgentError {
    /// 创建 LLM 服务调用错误
    pub fn service(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AgentError::Service(Box::new(source))
    }

    /// 创建结构化解码错误，自动截断原始响应作为诊断片段
    pub fn decode(record: &'static str, raw_response: &str) -> Self {
        AgentError::Decode {
            record,
            snippet: truncate_chars(raw_response, SNIPPET_MAX_CHARS),
        }
    }

    /// 创建渲染后端错误，附带可操作的修复提示
    pub fn render_backend(detail: impl Into<String>) -> Self {
        AgentError::RenderBackend {
            hint: "请确认本机已安装 Chrome/Chromium，或仅保留 HTML 产物".to_string(),
            detail: detail.into(),
        }
    }

    /// 创建文件读写错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        AgentError::File {
            path: path.into(),
            source,
        }
    }
}

/// 按字符数截断长文本
fn truncate_chars(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_truncates_snippet() {
        let raw = "x".repeat(2000);
        let err = AgentError::decode("ResumeRecord", &raw);
        match err {
            AgentError::Decode { record, snippet } => {
                assert_eq!(record, "ResumeRecord");
                assert_eq!(snippet.chars().count(), 503); // 500 + "..."
            }
            other => panic!("意外的错误类型: {:?}", other),
        }
    }

    #[test]
    fn test_decode_error_keeps_short_snippet() {
        let err = AgentError::decode("CritiqueRecord", "不是JSON");
        match err {
            AgentError::Decode { snippet, .. } => assert_eq!(snippet, "不是JSON"),
            other => panic!("意外的错误类型: {:?}", other),
        }
    }
}
