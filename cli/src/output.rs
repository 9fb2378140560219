use colored::Colorize;
use provision::PassReport;

pub fn header(title: &str) {
    println!("{}", title.bold().underline());
}

pub fn hint(msg: &str) {
    eprintln!("{} {}", "hint:".cyan().bold(), msg.dimmed());
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// One line per pass: platform, operation, endpoint and counts.
pub fn pass_line(report: &PassReport) {
    let label = format!(
        "{} {} {}",
        report.platform,
        report.operation,
        report.endpoint.dimmed(),
    );

    if let Some(reason) = &report.aborted {
        println!("  {} {} aborted: {}", "✗".red(), label, reason.red());
    } else if report.succeeded() {
        println!(
            "  {} {} {} operations",
            "✓".green(),
            label,
            report.attempted,
        );
    } else {
        println!(
            "  {} {} {} of {} operations failed",
            "✗".red(),
            label,
            report.failures.len().to_string().yellow(),
            report.attempted,
        );
    }
}
