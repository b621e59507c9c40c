//! 简历数据模型
//!
//! 每个结构化记录类型都随类型定义附带一份显式的 JSON Schema
//! （定义期写死，不做运行时反射），发送请求时随提示词一起下发。
//! 解码时先按类型反序列化，再做取值范围校验。

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

/// 结构化记录：可随提示词下发 Schema、可在解码后自校验的类型
pub trait StructuredRecord: Serialize + DeserializeOwned {
    /// 记录类型名（用于错误诊断）
    fn record_name() -> &'static str;

    /// 该类型的 JSON Schema 描述
    fn schema() -> JsonValue;

    /// 解码后的取值范围校验，违反者按解码失败处理
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// 项目经历
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// 项目名称
    pub project_name: String,
    /// 担任角色
    pub role: String,
    /// 开始时间，如 2023.01
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// 结束时间，如 2023.06 或 至今
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// 基于 STAR 法则优化的项目要点，必须包含量化数据
    pub optimized_bullets: Vec<String>,
    /// 该项目用到的、与 JD 匹配的技术关键词
    pub matched_skills: Vec<String>,
}

/// 教育背景
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    /// 学校名称
    pub school: String,
    /// 学位，如 本科、硕士
    pub degree: String,
    /// 专业
    pub major: String,
    /// 入学年份
    pub start_year: String,
    /// 毕业年份
    pub end_year: String,
    /// 所获荣誉或奖项
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub honors: Option<Vec<String>>,
}

/// 完整简历记录
///
/// 每个阶段整体替换、从不局部修改：Draft 产出一份，
/// Refine（如执行）产出一份全新的替换它。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    /// 姓名
    pub name: String,
    /// 意向岗位/专业头衔
    pub title: String,
    /// 联系方式 (phone, email, github, blog 等)
    pub contact: BTreeMap<String, String>,
    /// 个人总结，简练有力，突出核心优势
    pub summary: String,
    /// 技术栈列表，按熟练度排序
    pub skills: Vec<String>,
    /// 项目经历
    pub experience: Vec<ProjectEntry>,
    /// 教育背景
    pub education: Vec<EducationEntry>,
    /// 简历与 JD 的匹配度评分 (0-100)
    pub match_score: i64,
}

impl StructuredRecord for ResumeRecord {
    fn record_name() -> &'static str {
        "ResumeRecord"
    }

    fn schema() -> JsonValue {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "姓名，缺失时填 [待补充]" },
                "title": { "type": "string", "description": "意向岗位/专业头衔" },
                "contact": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "联系方式 (phone, email, github, blog 等)，缺失时填 [待补充]"
                },
                "summary": { "type": "string", "description": "个人总结，简练有力，突出核心优势" },
                "skills": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "技术栈列表，按熟练度排序"
                },
                "experience": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "project_name": { "type": "string", "description": "项目名称" },
                            "role": { "type": "string", "description": "担任角色" },
                            "start_date": { "type": "string", "description": "开始时间，如 2023.01" },
                            "end_date": { "type": "string", "description": "结束时间，如 2023.06 或 至今" },
                            "optimized_bullets": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "基于 STAR 法则优化的项目要点，必须包含量化数据"
                            },
                            "matched_skills": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "该项目用到的、与 JD 匹配的技术关键词"
                            }
                        },
                        "required": ["project_name", "role", "optimized_bullets", "matched_skills"]
                    }
                },
                "education": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "school": { "type": "string", "description": "学校名称" },
                            "degree": { "type": "string", "description": "学位，如 本科、硕士" },
                            "major": { "type": "string", "description": "专业" },
                            "start_year": { "type": "string", "description": "入学年份" },
                            "end_year": { "type": "string", "description": "毕业年份" },
                            "honors": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "所获荣誉或奖项"
                            }
                        },
                        "required": ["school", "degree", "major", "start_year", "end_year"]
                    }
                },
                "match_score": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 100,
                    "description": "简历与 JD 的匹配度评分 (0-100)"
                }
            },
            "required": [
                "name", "title", "contact", "summary",
                "skills", "experience", "education", "match_score"
            ]
        })
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !(0..=100).contains(&self.match_score) {
            return Err(format!(
                "match_score 超出范围 [0, 100]: {}",
                self.match_score
            ));
        }
        Ok(())
    }
}

/// 评审记录
///
/// needs_revision 与 score 是两个独立信号：高分草稿也可能被标记
/// 需要小修。是否真正进入修订由编排层的门槛判定共同决定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritiqueRecord {
    /// 评审总分 (0-100)
    pub score: i64,
    /// 评审意见
    pub critique: String,
    /// 是否需要修订
    pub needs_revision: bool,
    /// JD 中缺失的关键词，没有则为空数组
    #[serde(default)]
    pub missing_keywords: Vec<String>,
}

impl StructuredRecord for CritiqueRecord {
    fn record_name() -> &'static str {
        "CritiqueRecord"
    }

    fn schema() -> JsonValue {
        json!({
            "type": "object",
            "properties": {
                "score": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 100,
                    "description": "评审总分 (0-100)"
                },
                "critique": { "type": "string", "description": "评审意见，说明扣分原因" },
                "needs_revision": { "type": "boolean", "description": "是否需要修订" },
                "missing_keywords": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "JD 中提到但简历未覆盖的关键词，没有则为空数组"
                }
            },
            "required": ["score", "critique", "needs_revision", "missing_keywords"]
        })
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !(0..=100).contains(&self.score) {
            return Err(format!("score 超出范围 [0, 100]: {}", self.score));
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// 构造一份测试用的完整简历记录（供本 crate 其他测试模块复用）
    pub fn sample_resume() -> ResumeRecord {
        let mut contact = BTreeMap::new();
        contact.insert("email".to_string(), "dev@example.com".to_string());
        contact.insert("phone".to_string(), "[待补充]".to_string());

        ResumeRecord {
            name: "张三".to_string(),
            title: "后端工程师".to_string(),
            contact,
            summary: "5 年后端经验，擅长高并发消息系统。".to_string(),
            skills: vec!["Rust".to_string(), "Kafka".to_string()],
            experience: vec![ProjectEntry {
                project_name: "订单队列服务优化".to_string(),
                role: "核心开发".to_string(),
                start_date: Some("2022.03".to_string()),
                end_date: Some("2023.06".to_string()),
                optimized_bullets: vec![
                    "针对订单高峰期消息积压问题，重构消费者线程模型，端到端延迟降低 60%".to_string(),
                ],
                matched_skills: vec!["Kafka".to_string()],
            }],
            education: vec![EducationEntry {
                school: "某大学".to_string(),
                degree: "本科".to_string(),
                major: "计算机科学".to_string(),
                start_year: "2014".to_string(),
                end_year: "2018".to_string(),
                honors: None,
            }],
            match_score: 85,
        }
    }

    #[test]
    fn test_resume_roundtrip() {
        let resume = sample_resume();
        let text = serde_json::to_string(&resume).unwrap();
        let back: ResumeRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(resume, back);
    }

    #[test]
    fn test_resume_missing_field_is_rejected() {
        // 缺少 match_score，反序列化必须失败
        let text = r#"{"name":"张三","title":"工程师","contact":{},"summary":"",
            "skills":[],"experience":[],"education":[]}"#;
        assert!(serde_json::from_str::<ResumeRecord>(text).is_err());
    }

    #[test]
    fn test_match_score_range_validation() {
        let mut resume = sample_resume();
        resume.match_score = 101;
        assert!(resume.validate().is_err());
        resume.match_score = -1;
        assert!(resume.validate().is_err());
        resume.match_score = 0;
        assert!(resume.validate().is_ok());
        resume.match_score = 100;
        assert!(resume.validate().is_ok());
    }

    #[test]
    fn test_critique_score_range_validation() {
        let critique = CritiqueRecord {
            score: 120,
            critique: String::new(),
            needs_revision: false,
            missing_keywords: vec![],
        };
        assert!(critique.validate().is_err());
    }

    #[test]
    fn test_critique_missing_keywords_defaults_empty() {
        // missing_keywords 缺省为空数组
        let text = r#"{"score":88,"critique":"量化充分","needs_revision":false}"#;
        let critique: CritiqueRecord = serde_json::from_str(text).unwrap();
        assert!(critique.missing_keywords.is_empty());
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = ResumeRecord::schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        for field in [
            "name", "title", "contact", "summary", "skills", "experience", "education",
            "match_score",
        ] {
            assert!(required.contains(&field), "schema 缺少必填字段: {}", field);
        }
    }
}
