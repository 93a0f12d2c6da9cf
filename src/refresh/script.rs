//! Updater Script
//!
//! Renders the browser-side refresh script served at
//! `/static/js/updater.js`. The script mirrors the native session: a
//! repeating reload timer plus a visibilitychange listener that reloads
//! immediately on re-focus and only logs when the tab is hidden.

use std::time::Duration;

/// Renders the updater script with the configured interval baked in.
pub fn updater_script(refresh_interval: Duration) -> String {
    format!(
        r#"// Auto-refresh the page to get updated status
const REFRESH_INTERVAL = {interval}; // milliseconds

function refreshPage() {{
    // Reload the page to get fresh data from the server
    window.location.reload();
}}

// Set up auto-refresh
setInterval(refreshPage, REFRESH_INTERVAL);

// Visibility API: refresh immediately when the tab regains focus
document.addEventListener('visibilitychange', function() {{
    if (document.hidden) {{
        console.log('Page hidden - updates will continue');
    }} else {{
        console.log('Page visible - refreshing now');
        refreshPage();
    }}
}});
"#,
        interval = refresh_interval.as_millis()
    )
}
