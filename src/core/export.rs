use chrono::NaiveDateTime;

use crate::core::models::stats::ConfigLinkReport;
use crate::error::Error;

pub const CSV_HEADER: &str = "configLinkId,categoryName,imageName,imagePath,questionText,optionText,count";

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One line per option count, `\n` terminated.
pub fn to_csv(reports: &[ConfigLinkReport]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for r in reports {
        for image in &r.images {
            for question in &image.questions {
                for option in &question.options {
                    let fields = [
                        csv_quote(&r.config_link_id),
                        csv_quote(&r.category_name),
                        csv_quote(&image.image_name),
                        csv_quote(&image.image_path),
                        csv_quote(&question.question_text),
                        csv_quote(&option.option_text),
                        option.count.to_string(),
                    ];
                    out.push_str(&fields.join(","));
                    out.push('\n');
                }
            }
        }
    }
    out
}

pub fn to_json(reports: &[ConfigLinkReport]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(reports)?)
}

pub fn export_file_name(user_id: i32, now: NaiveDateTime, extension: &str) -> String {
    format!("answers_{}_{}.{}", user_id, now.format("%Y%m%d%H%M%S"), extension)
}
