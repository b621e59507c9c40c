//! 结构化生成服务 - 业务能力层
//!
//! 封装与 LLM 的单次往返：把目标类型的 Schema 随提示词一起下发，
//! 要求服务以严格 JSON 模式应答，并把响应解码为带类型的记录。
//! 调用方拿到的要么是通过校验的记录，要么是明确的错误——
//! 永远不会拿到未解析的原始文本。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 DeepSeek、Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::models::StructuredRecord;

/// 聊天后端：一次 system + user 消息往返，要求返回单个 JSON 值
///
/// 这是测试替身的接缝：真实实现走 async-openai，
/// 测试用固定响应的桩实现。
pub trait ChatBackend {
    fn complete_json(
        &self,
        system_message: &str,
        user_message: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// LLM 服务
///
/// 职责：
/// - 调用兼容 OpenAI API 的聊天接口
/// - 单次请求，不重试（重试会掩盖提示词/Schema 的漂移）
/// - 不关心阶段顺序，只处理单次往返
pub struct LlmService {
    api_key: Option<String>,
    api_base_url: String,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    ///
    /// 凭证缺失不在此处报错，推迟到首次调用时。
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.clone(),
            model_name: config.llm_model_name.clone(),
        }
    }
}

impl ChatBackend for LlmService {
    async fn complete_json(&self, system_message: &str, user_message: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| AgentError::Config {
            var: "OPENAI_API_KEY".to_string(),
        })?;

        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.chars().count());

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base_url);
        let client = Client::with_config(openai_config);

        // 构建消息列表：一条 system + 一条 user
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_message)
            .build()
            .map_err(AgentError::service)?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(AgentError::service)?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        // 严格 JSON 模式：响应必须是单个 JSON 值，无散文、无代码块包裹
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(AgentError::service)?;

        let response = client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AgentError::service(e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AgentError::decode("ChatCompletion", "（LLM 返回内容为空）"))?;

        Ok(content.trim().to_string())
    }
}

/// 发起一次 Schema 约束的结构化生成
///
/// 在调用方的 system 提示词后追加固定的输出契约（JSON Only、
/// 禁止代码块包裹）和目标类型的 Schema，然后把响应解码为 `T`。
///
/// # 参数
/// - `backend`: 聊天后端
/// - `system_prompt`: 阶段性的角色与规则说明
/// - `user_message`: 任务载荷
///
/// # 返回
/// 通过 Schema 校验的类型化记录
pub async fn generate<T, B>(backend: &B, system_prompt: &str, user_message: &str) -> Result<T>
where
    T: StructuredRecord,
    B: ChatBackend,
{
    let schema_json = serde_json::to_string_pretty(&T::schema()).unwrap_or_default();

    let full_system = format!(
        r#"{system_prompt}

### 输出要求：
- **JSON Only**: 仅返回符合以下 Schema 的 JSON 字符串。
- **No Markdown**: 不要使用 ```json 代码块包裹。
- **Schema**:
{schema_json}"#
    );

    let raw = backend.complete_json(&full_system, user_message).await?;
    decode_structured(&raw)
}

/// 把原始响应解码为类型化记录
///
/// 任何偏差（非 JSON、字段缺失、类型不符、取值越界）都按
/// 解码失败处理，错误中携带原始响应片段便于诊断。
pub fn decode_structured<T: StructuredRecord>(raw: &str) -> Result<T> {
    let record: T = serde_json::from_str(raw).map_err(|e| {
        warn!("❌ {} 解析失败: {}", T::record_name(), e);
        AgentError::decode(T::record_name(), raw)
    })?;

    record.validate().map_err(|reason| {
        warn!("❌ {} 校验失败: {}", T::record_name(), reason);
        AgentError::decode(T::record_name(), raw)
    })?;

    Ok(record)
}
