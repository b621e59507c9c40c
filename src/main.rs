use anyhow::Result;
use clap::Parser;

use resume_agent::utils::logging;
use resume_agent::{App, Config};

/// Resume Agent - 极速简历生成器
#[derive(Parser, Debug)]
#[command(name = "resume_agent", version, about)]
struct Cli {
    /// 包含原始经历/思绪的 Markdown 文件路径
    #[arg(long, default_value = "data/raw_thoughts.md")]
    thoughts: String,

    /// 包含目标职位描述 (JD) 的文本文件路径
    #[arg(long, default_value = "data/target_jd.txt")]
    jd: String,

    /// 生成的 HTML 简历保存路径（PDF 与之同名）
    #[arg(long, default_value = "output/tailored_resume.html")]
    output: String,

    /// 使用的 LLM 模型
    #[arg(long, default_value = "deepseek-chat")]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    let cli = Cli::parse();

    // 加载配置（命令行模型参数优先）
    let config = Config::from_env().with_model(&cli.model);

    // 运行流水线
    let app = App::new(config, &cli.thoughts, &cli.jd, &cli.output);
    app.run().await?;

    Ok(())
}
