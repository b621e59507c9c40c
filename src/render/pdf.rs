//! 固定页面转换 - 基础设施层
//!
//! 把已渲染的 HTML 装入无头浏览器，量取实际内容高度，
//! 超出单页上限时计算一次性的整体缩放（下限 0.75），
//! 然后以该缩放导出单页 A4 PDF。
//!
//! 单次量取、单次缩放、单次捕获：不在缩放后复测
//! （缩放后的排版被假定而非验证为放得下，这是上游已知的近似）。
//! 浏览器是作用域资源：无论成功失败，本次调用结束时必被关闭。

use std::path::Path;

use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};

/// 单页最大内容高度（约 A4 可打印高度 @ 96 DPI，去除页边距）
pub const MAX_CONTENT_HEIGHT_PX: f64 = 1080.0;

/// 最小缩放下限：低于此缩放的内容视为不可读，宁可溢出也不再缩
pub const MIN_SCALE: f64 = 0.75;

/// A4 纸面尺寸（英寸）
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;

/// 计算内容适配缩放
///
/// 内容不超高时返回 1.0；超高时按比例缩小，但不低于 [`MIN_SCALE`]。
pub fn fit_scale(extent: f64, max: f64) -> f64 {
    if extent <= max {
        1.0
    } else {
        (max / extent).max(MIN_SCALE)
    }
}

/// 将 HTML 文件转换为单页 A4 PDF
///
/// # 参数
/// - `html_path`: 已渲染的 HTML 文件路径（不存在则直接报错，不启动浏览器）
/// - `pdf_path`: PDF 输出路径，按需创建中间目录
pub async fn html_to_pdf(html_path: &Path, pdf_path: &Path) -> Result<()> {
    // 源文件检查在启动任何浏览器进程之前
    if !html_path.exists() {
        return Err(AgentError::RenderSourceNotFound {
            path: html_path.display().to_string(),
        });
    }

    let abs_path = html_path
        .canonicalize()
        .map_err(|e| AgentError::file(html_path.display().to_string(), e))?;
    let url = format!("file://{}", abs_path.display());

    let mut browser = launch_headless_browser().await?;

    // 浏览器是作用域资源：先收集结果，再在所有退出路径上关闭
    let result = print_fixed_page(&browser, &url, pdf_path).await;

    if let Err(e) = browser.close().await {
        warn!("关闭无头浏览器失败: {}", e);
    }
    let _ = browser.wait().await;

    result
}

/// 启动无头浏览器
async fn launch_headless_browser() -> Result<Browser> {
    info!("🚀 启动无头浏览器...");

    let config = BrowserConfig::builder()
        .new_headless_mode()
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--remote-debugging-port=0",
        ])
        .build()
        .map_err(AgentError::render_backend)?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .map_err(|e| AgentError::render_backend(format!("启动无头浏览器失败: {e}")))?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok(browser)
}

/// 装入页面、量取高度、单次缩放并导出 PDF
async fn print_fixed_page(browser: &Browser, url: &str, pdf_path: &Path) -> Result<()> {
    let page = browser
        .new_page(url)
        .await
        .map_err(|e| AgentError::render_backend(format!("创建页面失败: {e}")))?;

    page.wait_for_navigation()
        .await
        .map_err(|e| AgentError::render_backend(format!("导航到 {url} 失败: {e}")))?;

    let extent = measure_content_height(&page).await?;
    let scale = fit_scale(extent, MAX_CONTENT_HEIGHT_PX);

    if scale < 1.0 {
        info!(
            "⚖️ 内容高度 {:.0}px 超出单页上限 {:.0}px，整体缩放至 {:.0}%",
            extent,
            MAX_CONTENT_HEIGHT_PX,
            scale * 100.0
        );
        if extent * MIN_SCALE > MAX_CONTENT_HEIGHT_PX {
            warn!("⚠️ 已到最小缩放下限 {:.0}%，内容仍可能溢出到下一页", MIN_SCALE * 100.0);
        }
    } else {
        debug!("内容高度 {:.0}px 未超出单页上限，按 100% 导出", extent);
    }

    // 零页边距、保留背景图形，按计算出的缩放一次性捕获
    let params = PrintToPdfParams {
        print_background: Some(true),
        scale: Some(scale),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        margin_top: Some(0.0),
        margin_bottom: Some(0.0),
        margin_left: Some(0.0),
        margin_right: Some(0.0),
        ..Default::default()
    };

    let bytes = page
        .pdf(params)
        .await
        .map_err(|e| AgentError::render_backend(format!("导出 PDF 失败: {e}")))?;

    if let Some(parent) = pdf_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AgentError::file(parent.display().to_string(), e))?;
        }
    }
    std::fs::write(pdf_path, bytes)
        .map_err(|e| AgentError::file(pdf_path.display().to_string(), e))?;

    info!("📄 PDF 已生成: {}", pdf_path.display());
    Ok(())
}

/// 量取页面实际内容高度（布局像素）
async fn measure_content_height(page: &Page) -> Result<f64> {
    let result = page
        .evaluate("document.body.scrollHeight")
        .await
        .map_err(|e| AgentError::render_backend(format!("量取内容高度失败: {e}")))?;

    let extent: f64 = result
        .into_value()
        .map_err(|e| AgentError::render_backend(format!("内容高度取值失败: {e}")))?;

    debug!("页面内容高度: {:.0}px", extent);
    Ok(extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_no_overflow_is_identity() {
        assert_eq!(fit_scale(800.0, MAX_CONTENT_HEIGHT_PX), 1.0);
        assert_eq!(fit_scale(1080.0, MAX_CONTENT_HEIGHT_PX), 1.0);
    }

    #[test]
    fn test_fit_scale_proportional_shrink() {
        // 1350px 超出上限，按比例缩到 0.8（未触及下限）
        assert!((fit_scale(1350.0, 1080.0) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_fit_scale_clamped_at_floor() {
        // 按比例应缩到 0.5 / 0.216，均被钳到下限 0.75
        assert_eq!(fit_scale(2160.0, 1080.0), MIN_SCALE);
        assert_eq!(fit_scale(5000.0, 1080.0), MIN_SCALE);
    }

    #[test]
    fn test_fit_scale_just_over_limit() {
        let scale = fit_scale(1200.0, 1080.0);
        assert!(scale < 1.0 && scale > MIN_SCALE);
        assert!((scale - 0.9).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_source_fails_before_backend_launch() {
        let missing = Path::new("/nonexistent/resume_agent/input.html");
        let err = html_to_pdf(missing, Path::new("/tmp/out.pdf"))
            .await
            .unwrap_err();
        match err {
            AgentError::RenderSourceNotFound { path } => {
                assert!(path.contains("input.html"));
            }
            other => panic!("应得到 RenderSourceNotFound，实际: {:?}", other),
        }
    }
}
