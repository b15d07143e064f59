use scanner_core::{AppViewModel, NoticeKind, RiskLevel, ScanResult};

const BAR_WIDTH: usize = 40;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(label) = view.busy_label() {
        lines.push(label.to_string());
        return lines;
    }

    if let Some(notice) = &view.notice {
        let tag = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        lines.push(format!("[{tag}] {}", notice.message));
    }

    match &view.result {
        Some(result) => render_result(result, &mut lines),
        None if view.error_message.is_none() => lines.push(
            "Awaiting scan output. Run a website or text scan to view risk metrics and suspicious snippets."
                .to_string(),
        ),
        None => {}
    }

    lines
}

fn render_result(result: &ScanResult, lines: &mut Vec<String>) {
    lines.push(format!("Risk: {}", risk_badge(result.risk_level)));
    lines.push(format!(
        "Total contents scanned: {} | Dark patterns detected: {} | Dark ratio: {}%",
        result.total_contents_scanned, result.total_dark_patterns_detected, result.dark_ratio
    ));
    lines.push(format!(
        "Dark pattern exposure [{}] {}%",
        exposure_bar(result.dark_ratio),
        result.dark_ratio
    ));

    if result.detected_texts.is_empty() {
        lines.push("No dark pattern snippets detected in the current scan.".to_string());
        return;
    }

    lines.push("Detected text snippets:".to_string());
    for (index, snippet) in result.detected_texts.iter().enumerate() {
        lines.push(format!(
            "  {}. {} (confidence {:.2}%)",
            index + 1,
            snippet.text,
            snippet.confidence * 100.0
        ));
    }
}

fn risk_badge(level: RiskLevel) -> String {
    match level {
        RiskLevel::High => format!("{level} (!)"),
        RiskLevel::Medium => format!("{level} (~)"),
        RiskLevel::Low => format!("{level}"),
    }
}

fn exposure_bar(ratio: f64) -> String {
    let filled = ((ratio.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}
