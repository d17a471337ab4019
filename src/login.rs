//! QR login flow.
//!
//! Navigates to the client, waits for the user to scan the QR code, then
//! waits for the authenticated UI to mount. Every unmet bound here is
//! fatal to the run except the initial QR marker wait, which is
//! best-effort: a marker that never shows up may mean the profile is
//! already paired, so the flow falls through to the readiness poll.

use crate::config::Config;
use crate::wait;
use anyhow::{Context, Result, anyhow};
use chromiumoxide::Page;
use tracing::{debug, info};

/// Element shown while the session is unauthenticated and waiting for a
/// QR scan.
pub const QR_CODE_SELECTOR: &str = "mw-qr-code";
/// Element present only once the authenticated UI has mounted.
pub const APP_ROOT_SELECTOR: &str = "mw-main-nav";
/// Conversation list container.
pub const CONVERSATION_LIST_SELECTOR: &str = "mws-conversations-list";

/// All three conditions must hold at once: QR marker gone, app root
/// mounted, loading indicator hidden or absent. Mirrors the selector
/// constants above.
const READY_PREDICATE: &str = r#"
(() => {
    const challenge = document.querySelector('mw-qr-code');
    const root = document.querySelector('mw-main-nav');
    const loading = document.querySelector('.loading-container');
    const loadingHidden = !loading
        || loading.getAttribute('aria-hidden') === 'true'
        || window.getComputedStyle(loading).display === 'none';
    return !challenge && !!root && loadingHidden;
})()
"#;

pub async fn login(page: &Page, config: &Config) -> Result<()> {
    let timeouts = &config.timeouts;

    info!(url = %config.base_url, "navigating to messaging client");
    let navigation = async {
        page.goto(config.base_url.as_str())
            .await
            .context("navigation failed")?;
        page.wait_for_navigation()
            .await
            .context("page never finished loading")?;
        Ok::<(), anyhow::Error>(())
    };
    tokio::time::timeout(timeouts.navigation(), navigation)
        .await
        .map_err(|_| {
            anyhow!(
                "navigation to {} did not settle within {}s",
                config.base_url,
                timeouts.navigation_secs
            )
        })??;

    if wait::wait_for_selector(
        page,
        QR_CODE_SELECTOR,
        timeouts.selector(),
        timeouts.poll_interval(),
    )
    .await
    {
        info!("QR code shown, waiting for scan");
    } else {
        // Could be an already-paired profile; the readiness poll below
        // decides either way.
        debug!("login challenge marker never appeared, continuing");
    }

    let ready = wait::wait_until(
        page,
        READY_PREDICATE,
        timeouts.login(),
        timeouts.poll_interval(),
    )
    .await;
    if !ready {
        return Err(anyhow!(
            "login did not complete within {}s",
            timeouts.login_secs
        ));
    }

    tokio::time::sleep(timeouts.settle()).await;

    if !wait::wait_for_selector(
        page,
        CONVERSATION_LIST_SELECTOR,
        timeouts.conversation_list(),
        timeouts.poll_interval(),
    )
    .await
    {
        return Err(anyhow!(
            "conversation list did not appear within {}s of login",
            timeouts.conversation_list_secs
        ));
    }

    info!("login complete");
    Ok(())
}
