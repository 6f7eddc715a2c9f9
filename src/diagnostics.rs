//! Setup diagnostics for the `check` subcommand.
//!
//! Verifies that audio devices exist and that the configured cloud services
//! are reachable. Everything here is advisory; a warning never aborts.

use crate::config::Config;
use std::time::Duration;

/// Result of a single check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Working as expected
    Ok,
    /// Missing or unreachable
    Failed(String),
    /// Present but suspicious
    Warning(String),
}

/// Probe a service base URL with a short GET.
///
/// Any HTTP response counts as reachable — a 404 on the bare base URL is
/// normal, the point is that the host answered at all.
async fn probe_service(client: &reqwest::Client, base_url: &str) -> CheckResult {
    match client
        .get(base_url)
        .timeout(Duration::from_secs(5))
        .send()
        .await
    {
        Ok(_) => CheckResult::Ok,
        Err(e) => CheckResult::Failed(format!("{}", e)),
    }
}

fn render(name: &str, result: &CheckResult) {
    match result {
        CheckResult::Ok => println!("{:28} ✓ OK", name),
        CheckResult::Failed(msg) => println!("{:28} ✗ {}", name, msg),
        CheckResult::Warning(msg) => println!("{:28} ⚠ {}", name, msg),
    }
}

fn render_key(name: &str, configured: bool, env_var: &str) {
    if configured {
        println!("{:28} ✓ configured", name);
    } else {
        println!("{:28} - not set (config key or {})", name, env_var);
    }
}

/// Check audio devices.
#[cfg(feature = "cpal-audio")]
fn check_audio_devices() {
    match crate::audio::capture::list_devices() {
        Ok(devices) if !devices.is_empty() => {
            render("Audio input", &CheckResult::Ok);
            for device in &devices {
                println!("  {}", device);
            }
        }
        Ok(_) => render(
            "Audio input",
            &CheckResult::Failed("no input devices found".to_string()),
        ),
        Err(e) => render("Audio input", &CheckResult::Failed(e.to_string())),
    }

    match crate::audio::playback::list_output_devices() {
        Ok(devices) if !devices.is_empty() => {
            render("Audio output", &CheckResult::Ok);
            for device in &devices {
                println!("  {}", device);
            }
        }
        Ok(_) => render(
            "Audio output",
            &CheckResult::Failed("no output devices found".to_string()),
        ),
        Err(e) => render("Audio output", &CheckResult::Failed(e.to_string())),
    }
}

/// Run all checks and print results.
pub async fn check_dependencies(config: &Config) {
    println!("Checking voxlate setup...\n");

    #[cfg(feature = "cpal-audio")]
    check_audio_devices();
    #[cfg(not(feature = "cpal-audio"))]
    println!("Audio devices: skipped (built without cpal-audio)");

    println!();

    let client = reqwest::Client::new();

    let recognition = probe_service(&client, &config.recognition.base_url).await;
    render("Recognition service", &recognition);
    render_key(
        "Recognition API key",
        config.recognition.api_key.is_some(),
        "VOXLATE_RECOGNITION_API_KEY",
    );

    let translation = probe_service(&client, &config.translation.base_url).await;
    render("Translation service", &translation);
    render_key(
        "Translation API key",
        config.translation.api_key.is_some(),
        "VOXLATE_TRANSLATION_API_KEY",
    );

    let tts = probe_service(&client, &config.tts.base_url).await;
    render("Text-to-speech service", &tts);
    render_key(
        "Text-to-speech API key",
        config.tts.api_key.is_some(),
        "VOXLATE_TTS_API_KEY",
    );

    println!();
    println!(
        "Languages: {} → {}",
        config.recognition.language, config.translation.target
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_equality() {
        assert_eq!(CheckResult::Ok, CheckResult::Ok);
        assert_eq!(
            CheckResult::Failed("x".to_string()),
            CheckResult::Failed("x".to_string())
        );
        assert_ne!(CheckResult::Ok, CheckResult::Failed("x".to_string()));
        assert_ne!(
            CheckResult::Warning("a".to_string()),
            CheckResult::Warning("b".to_string())
        );
    }

    #[tokio::test]
    async fn test_probe_unreachable_service_fails() {
        let client = reqwest::Client::new();
        // Reserved TEST-NET-1 address, nothing listens there
        let result = probe_service(&client, "http://192.0.2.1:9/").await;
        assert!(matches!(result, CheckResult::Failed(_)));
    }

    #[test]
    fn test_render_does_not_panic() {
        render("Name", &CheckResult::Ok);
        render("Name", &CheckResult::Failed("gone".to_string()));
        render("Name", &CheckResult::Warning("odd".to_string()));
        render_key("Key", true, "VAR");
        render_key("Key", false, "VAR");
    }
}
