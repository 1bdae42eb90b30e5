//! Page view tracking and the dashboard summary built from it.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use url::Url;

use super::now_rfc3339;
use crate::cms::types::PageView;
use crate::cms::{ContentStore, Edit};

/// How many pages the dashboard ranks
const TOP_PAGES: usize = 5;
/// Length of the daily views chart
const CHART_DAYS: i64 = 7;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PathViews {
    pub path: String,
    pub views: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyViews {
    /// Short label such as `Mar 7`
    pub date: String,
    pub views: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceViews {
    pub source: String,
    pub views: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_views: usize,
    pub total_unique_visitors: usize,
    pub views_today: usize,
    pub daily_change_percent: f64,
    pub unique_visitors_today: usize,
    pub top_pages: Vec<PathViews>,
    pub daily_views: Vec<DailyViews>,
    pub traffic_sources: Vec<SourceViews>,
}

/// Record one page view. Missing client details are stored as `unknown`.
pub async fn track_page_view(
    store: &ContentStore,
    path: &str,
    ip: Option<&str>,
    user_agent: Option<&str>,
    referrer: Option<&str>,
) {
    let view = PageView {
        path: path.to_string(),
        timestamp: now_rfc3339(),
        ip: ip.unwrap_or("unknown").to_string(),
        user_agent: user_agent.unwrap_or("unknown").to_string(),
        referrer: referrer.map(str::to_string),
    };

    let result = store
        .update_analytics(|views| {
            views.push(view.clone());
            Edit::Save(())
        })
        .await;
    if let Err(e) = result {
        tracing::error!("Failed to record page view for {}: {}", path, e);
    }
}

/// Load every recorded view and summarise it as of now
pub async fn get_analytics_data(store: &ContentStore, site_host: Option<&str>) -> AnalyticsSummary {
    let views = store.get_analytics().await;
    analytics_summary(&views, Utc::now(), site_host)
}

fn view_day(view: &PageView) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(&view.timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc).date_naive())
}

/// Count occurrences, keeping keys in first-seen order
fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for key in keys {
        match index.get(key) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(key, order.len());
                order.push((key, 1));
            }
        }
    }
    order
}

/// Build the dashboard numbers. Days are UTC calendar days.
pub fn analytics_summary(
    views: &[PageView],
    now: DateTime<Utc>,
    site_host: Option<&str>,
) -> AnalyticsSummary {
    let today = now.date_naive();
    let yesterday = today - Duration::days(1);

    let days: Vec<Option<NaiveDate>> = views.iter().map(view_day).collect();
    let today_views: Vec<&PageView> = views
        .iter()
        .zip(&days)
        .filter(|(_, day)| **day == Some(today))
        .map(|(view, _)| view)
        .collect();
    let yesterday_count = days.iter().filter(|day| **day == Some(yesterday)).count();
    let today_count = today_views.len();

    let daily_change_percent = if yesterday_count > 0 {
        (today_count as f64 - yesterday_count as f64) / yesterday_count as f64 * 100.0
    } else if today_count > 0 {
        100.0
    } else {
        0.0
    };

    let mut top_pages = tally(views.iter().map(|v| v.path.as_str()));
    // Stable, so ties keep first-seen order
    top_pages.sort_by(|a, b| b.1.cmp(&a.1));
    let top_pages = top_pages
        .into_iter()
        .take(TOP_PAGES)
        .map(|(path, views)| PathViews {
            path: path.to_string(),
            views,
        })
        .collect();

    let daily_views = (0..CHART_DAYS)
        .rev()
        .map(|ago| {
            let day = today - Duration::days(ago);
            DailyViews {
                date: day.format("%b %-d").to_string(),
                views: days.iter().filter(|d| **d == Some(day)).count(),
            }
        })
        .collect();

    let traffic_sources = tally(
        views
            .iter()
            .map(|v| classify_referrer(v.referrer.as_deref(), site_host)),
    )
    .into_iter()
    .map(|(source, views)| SourceViews {
        source: source.to_string(),
        views,
    })
    .collect();

    AnalyticsSummary {
        total_views: views.len(),
        total_unique_visitors: views.iter().map(|v| v.ip.as_str()).collect::<HashSet<_>>().len(),
        views_today: today_count,
        daily_change_percent,
        unique_visitors_today: today_views
            .iter()
            .map(|v| v.ip.as_str())
            .collect::<HashSet<_>>()
            .len(),
        top_pages,
        daily_views,
        traffic_sources,
    }
}

/// Name the traffic source behind a `Referer` header
pub fn classify_referrer(referrer: Option<&str>, site_host: Option<&str>) -> &'static str {
    let Some(referrer) = referrer.filter(|r| !r.is_empty()) else {
        return "Direct";
    };
    let Ok(url) = Url::parse(referrer) else {
        return "Other";
    };
    let Some(host) = url.host_str() else {
        return "Other";
    };

    if site_host.is_some_and(|site| !site.is_empty() && host.contains(site)) {
        return "Direct";
    }

    const SOURCES: &[(&[&str], &str)] = &[
        (&["localhost"], "Direct"),
        (&["google."], "Google"),
        (&["bing."], "Bing"),
        (&["duckduckgo."], "DuckDuckGo"),
        (&["facebook."], "Facebook"),
        (&["t.co", "twitter."], "Twitter / X"),
        (&["linkedin."], "LinkedIn"),
        (&["instagram."], "Instagram"),
    ];
    SOURCES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| host.contains(n)))
        .map(|(_, source)| *source)
        .unwrap_or("Other")
}
