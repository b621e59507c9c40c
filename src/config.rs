/// 程序配置
///
/// API 凭证与服务地址在启动时从环境变量读取一次；
/// 凭证缺失不在此处校验，而是在首次调用 LLM 服务时报错。
#[derive(Clone, Debug)]
pub struct Config {
    /// LLM API 密钥（缺失时首次调用报 ConfigError）
    pub llm_api_key: Option<String>,
    /// LLM API 基础 URL
    pub llm_api_base_url: String,
    /// LLM 模型名称
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: None,
            llm_api_base_url: "https://api.deepseek.com".to_string(),
            llm_model_name: "deepseek-chat".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("OPENAI_API_KEY").ok(),
            llm_api_base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
        }
    }

    /// 覆盖模型名称（命令行参数优先于环境变量）
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.llm_model_name = model_name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm_api_base_url, "https://api.deepseek.com");
        assert_eq!(config.llm_model_name, "deepseek-chat");
        assert!(config.llm_api_key.is_none());
    }

    #[test]
    fn test_with_model_overrides() {
        let config = Config::default().with_model("deepseek-reasoner");
        assert_eq!(config.llm_model_name, "deepseek-reasoner");
    }
}
