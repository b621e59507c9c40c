//! # Resume Agent
//!
//! 把乱麻思绪 + 目标 JD 打磨成一页精美简历的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 业务能力层（Services）
//! - `services/llm_service` - 结构化生成能力：Schema 随提示词下发，
//!   响应按类型解码校验，失败携带原始片段
//!
//! ### ② 流程层（Workflow）
//! - `workflow/tailor_flow` - 质量闭环：Draft → Critique → (门槛判定) → Refine
//! - 修订至多一次，任一阶段失败整次终止
//!
//! ### ③ 渲染层（Render）
//! - `render/template` - 纯函数：简历记录 → HTML
//! - `render/pdf` - 无头浏览器：HTML → 单页 A4 PDF，内容超高时单次整体缩放
//!
//! ### ④ 编排层（App）
//! - `app` - 输入检查 → 打磨 → 渲染 → 报告评分

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AgentError, Result};
pub use models::{CritiqueRecord, EducationEntry, ProjectEntry, ResumeRecord, StructuredRecord};
pub use services::{ChatBackend, LlmService};
pub use workflow::{needs_refine, TailorFlow};
