//! 简历打磨流程 - 流程层
//!
//! 核心职责：定义"一次简历生成"的完整质量闭环
//!
//! 流程顺序：
//! 1. Draft   → 从乱麻思绪 + 目标 JD 起草完整简历
//! 2. Critique → 按三个维度严格评审草稿
//! 3. Refine  → 仅当评审过门槛判定时执行，整体替换草稿（至多一次）
//!
//! 任一阶段失败即终止整次运行，不返回部分结果。

use tracing::{debug, info};

use crate::error::Result;
use crate::models::{CritiqueRecord, ResumeRecord};
use crate::services::{generate, ChatBackend};

/// 修订门槛分数：评审分达到此值后即使被标记也不再修订
const REFINE_SCORE_GATE: i64 = 90;

/// 修订门槛判定
///
/// 仅当"被标记需要修订"且"评审分低于门槛"同时成立才进入修订。
/// 高分但被标记小修的草稿按原样接受，避免质量过线后的无谓重写。
pub fn needs_refine(critique: &CritiqueRecord) -> bool {
    critique.needs_revision && critique.score < REFINE_SCORE_GATE
}

/// 简历打磨流程
///
/// - 编排 Draft → Critique → (门槛判定) → Refine
/// - 中间记录只在内存中传递，阶段之间整体移交、不共享可变状态
/// - 不持有任何渲染资源
pub struct TailorFlow<B: ChatBackend> {
    backend: B,
}

impl<B: ChatBackend> TailorFlow<B> {
    /// 创建新的打磨流程
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// 访问底层聊天后端
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 执行完整的打磨闭环，返回最终简历记录
    ///
    /// # 参数
    /// - `raw_thoughts`: 用户的乱麻思绪（碎片化经历）
    /// - `jd_text`: 目标职位描述
    pub async fn run(&self, raw_thoughts: &str, jd_text: &str) -> Result<ResumeRecord> {
        // ========== 阶段 1: Draft ==========
        info!("📝 [1/3] 起草简历...");
        let draft: ResumeRecord = generate(
            &self.backend,
            DRAFT_SYSTEM_PROMPT,
            &build_draft_payload(jd_text, raw_thoughts),
        )
        .await?;
        info!("✓ 草稿完成，初始匹配度评分: {}", draft.match_score);

        // ========== 阶段 2: Critique ==========
        info!("🔍 [2/3] 评审草稿...");
        let critique: CritiqueRecord = generate(
            &self.backend,
            CRITIQUE_SYSTEM_PROMPT,
            &build_critique_payload(jd_text, &draft),
        )
        .await?;
        info!(
            "✓ 评审完成: 评分 {}, 需要修订: {}, 缺失关键词: {:?}",
            critique.score, critique.needs_revision, critique.missing_keywords
        );

        // ========== 门槛判定 + 阶段 3: Refine ==========
        if !needs_refine(&critique) {
            info!("✅ [3/3] 草稿通过质量门槛，跳过修订");
            return Ok(draft);
        }

        info!("🔧 [3/3] 按评审意见修订简历...");
        let refined: ResumeRecord = generate(
            &self.backend,
            REFINE_SYSTEM_PROMPT,
            &build_refine_payload(jd_text, &critique, &draft),
        )
        .await?;
        info!("✓ 修订完成，最终匹配度评分: {}", refined.match_score);

        // 修订结果无条件整体替换草稿，不做第二轮评审
        Ok(refined)
    }
}

// ========== 提示词 ==========

const DRAFT_SYSTEM_PROMPT: &str = r#"你是一位拥有20年经验的资深技术招聘官和简历专家。
你的任务是将用户提供的 [乱麻思绪]（碎片化信息）重写为一份针对 [目标 JD] 的高匹配度简历数据。

### 核心原则 (Critical):
1. **STAR 法则**：所有 [experience.optimized_bullets] 必须严格遵循 Situation(情境) -> Task(任务) -> Action(行动) -> Result(结果) 的结构。
2. **量化指标**：Result 部分必须包含具体的量化数据（如：性能提升50%，节约成本30%，QPS从1k提升至10k）。如果没有具体数据，请根据上下文合理估算一个保守值或强调定性成果。
3. **关键词匹配**：仔细分析 [目标 JD] 中的技术关键词，并将其自然地融入到简历的 [skills] 和 [experience] 中。
4. **格式严格**：教育经历 (education) 必须包含 start_year, end_year, school, degree, major 字段。

### 字段填充指南：
- 如果 [乱麻思绪] 缺少必要信息（如姓名、联系方式），请填入 "[待补充]"，不要省略任何必填字段。
- [match_score]：请根据用户经历与 JD 的匹配程度，客观打分 (0-100)。"#;

const CRITIQUE_SYSTEM_PROMPT: &str = r#"你是一位极其严格的简历评审官。
你的任务是对照 [目标 JD] 评审一份已生成的简历数据，不留情面地指出问题。

### 评审维度 (Critical):
1. **量化充分性**：每条项目要点的 Result 是否包含具体的量化数据或明确标注的估算值。
2. **关键词覆盖**：[目标 JD] 中的技术关键词是否已被 [skills] 和 [experience] 覆盖，
   未覆盖的全部列入 [missing_keywords]（没有则为空数组）。
3. **STAR 结构清晰度**：每条要点是否能清楚辨认出情境、任务、行动、结果。

### 打分指南：
- [score]：综合三个维度客观打分 (0-100)。
- [needs_revision]：只要存在值得修正的问题就置为 true，与分数高低无关。"#;

const REFINE_SYSTEM_PROMPT: &str = r#"你是一位拥有20年经验的资深技术招聘官和简历专家。
你的任务是根据 [评审意见] 修订 [简历草稿]，产出一份完整的替换版本。

### 修订原则 (Critical):
1. **补齐关键词**：将 [评审意见] 中列出的缺失关键词自然地融入 [skills] 和 [experience]，
   只在用户真实经历能够支撑的地方融入。
2. **强化量化**：对被指出量化不足的要点，补充具体数据或保守估算值。
3. **禁止编造**：绝对不允许虚构用户没有经历过的项目、职位或成果。
4. **完整输出**：返回完整的简历数据，所有必填字段都必须存在，缺失信息填 "[待补充]"。"#;

/// 构建起草阶段的用户载荷
fn build_draft_payload(jd_text: &str, raw_thoughts: &str) -> String {
    format!("【目标 JD】:\n{jd_text}\n\n【我的乱麻思绪】:\n{raw_thoughts}")
}

/// 构建评审阶段的用户载荷（JD + 序列化的草稿）
fn build_critique_payload(jd_text: &str, draft: &ResumeRecord) -> String {
    let draft_json = serde_json::to_string_pretty(draft).unwrap_or_default();
    debug!("评审载荷中的草稿长度: {} 字符", draft_json.chars().count());
    format!("【目标 JD】:\n{jd_text}\n\n【简历草稿】:\n{draft_json}")
}

/// 构建修订阶段的用户载荷（JD + 序列化的评审意见 + 序列化的草稿）
fn build_refine_payload(jd_text: &str, critique: &CritiqueRecord, draft: &ResumeRecord) -> String {
    let critique_json = serde_json::to_string_pretty(critique).unwrap_or_default();
    let draft_json = serde_json::to_string_pretty(draft).unwrap_or_default();
    format!(
        "【目标 JD】:\n{jd_text}\n\n【评审意见】:\n{critique_json}\n\n【简历草稿】:\n{draft_json}"
    )
}
