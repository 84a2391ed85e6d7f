use reqwest::Url;

const LINKEDIN_JOB_SEARCH: &str = "https://www.linkedin.com/jobs/search/";

/// Best-effort LinkedIn job search link for a posting. Only spaces are
/// escaped.
pub fn build_linkedin_search_url(company: &str, title: &str) -> String {
    let company = company.replace(' ', "%20");
    let title = title.replace(' ', "%20");
    format!("{}?keywords={}%20{}", LINKEDIN_JOB_SEARCH, title, company)
}

/// Resolve a possibly relative posting link against the board URL.
/// Absolute links pass through; empty links stay empty.
pub fn absolutize(base: &Url, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }

    match base.join(href) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}
