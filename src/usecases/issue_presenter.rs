//! Turn tracker issues into chat lines. Filtering and paging of `#open` results.

use crate::domain::Issue;

/// Three lines describing one issue: headline, metadata, URL.
pub fn format_issue(issue: &Issue) -> Vec<String> {
    let created = issue.created_at.format("%Y-%m-%d %H:%M:%S UTC");
    vec![
        format!("Issue #{} ({}): {}", issue.number, issue.state, issue.title),
        format!(
            "Created at {} by {}, {} comment(s), labels: {}",
            created,
            issue.author,
            issue.comments,
            issue.labels.join(", ")
        ),
        issue.url.clone(),
    ]
}

/// Keep issues having at least one label that contains at least one keyword,
/// case-insensitively. Relative order is preserved.
///
/// No keywords means nothing can match, so the result is empty.
pub fn filter_open_issues<'a>(issues: &'a [Issue], keywords: &[String]) -> Vec<&'a Issue> {
    let needles: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    issues
        .iter()
        .filter(|issue| {
            needles.iter().any(|needle| {
                issue
                    .labels
                    .iter()
                    .any(|label| label.to_lowercase().contains(needle.as_str()))
            })
        })
        .collect()
}

/// Slice `[start, start + page_size)` out of the filtered list.
///
/// `page_size == None` leaves the list untouched and ignores `start`.
pub fn paginate<T>(items: Vec<T>, start: usize, page_size: Option<usize>) -> Vec<T> {
    match page_size {
        None => items,
        Some(size) => items.into_iter().skip(start).take(size).collect(),
    }
}

/// One line per issue in a listing.
pub fn format_issue_summary(issue: &Issue) -> String {
    format!("Issue #{}: {}", issue.number, issue.title)
}
