use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::domain::activity::{Comment, Post, Snapshot};
use crate::types::{Metric, TimeRange};

pub const ACTIVITY_LIMIT: usize = 25;
pub const ACTIVITY_LABEL_MAX_CHARS: usize = 120;
pub const ALL_RANGE_FALLBACK_DAYS: u64 = 90;
pub const NO_SNAPSHOT_NOTICE: &str = "no snapshot available yet";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    pub range: TimeRange,
    pub keyword_only: bool,
    pub comments_only: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FilteredActivity<'a> {
    pub posts: Vec<&'a Post>,
    pub comments: Vec<&'a Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub upvotes: i64,
    pub comments_received: i64,
    pub post_count: usize,
    pub comment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub day: NaiveDate,
    pub label: String,
    pub upvotes: i64,
    pub comments: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubredditStat {
    pub name: String,
    pub upvotes: i64,
    pub comments: i64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Post,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub label: String,
    pub subreddit: String,
    pub score: i64,
    pub created_utc: i64,
    pub mentions_keyword: bool,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub filter: DashboardFilter,
    pub metric: Metric,
    pub fetched_at: Option<i64>,
    pub stats: DashboardStats,
    pub series: Vec<DailyPoint>,
    pub subreddits: Vec<SubredditStat>,
    pub activity: Vec<ActivityEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

pub fn build_dashboard<Tz: TimeZone>(
    snapshot: Option<&Snapshot>,
    filter: &DashboardFilter,
    metric: Metric,
    now: &DateTime<Tz>,
) -> DashboardView {
    let empty = Snapshot::default();
    let source = snapshot.unwrap_or(&empty);
    let activity = filter_snapshot(source, filter, now.timestamp());
    DashboardView {
        filter: *filter,
        metric,
        fetched_at: snapshot.map(|snapshot| snapshot.fetched_at),
        stats: compute_stats(&activity),
        series: daily_series(&activity, filter.range, now),
        subreddits: subreddit_rollup(&activity, metric),
        activity: recent_activity(&activity, ACTIVITY_LIMIT),
        notice: snapshot.is_none().then(|| NO_SNAPSHOT_NOTICE.to_string()),
    }
}

pub fn filter_snapshot<'a>(
    snapshot: &'a Snapshot,
    filter: &DashboardFilter,
    now_secs: i64,
) -> FilteredActivity<'a> {
    if filter.comments_only {
        return FilteredActivity {
            posts: Vec::new(),
            comments: filter_items(&snapshot.comments, filter, now_secs, |c| {
                (c.created_utc, c.mentions_keyword)
            }),
        };
    }
    FilteredActivity {
        posts: filter_items(&snapshot.posts, filter, now_secs, |p| {
            (p.created_utc, p.mentions_keyword)
        }),
        comments: filter_items(&snapshot.comments, filter, now_secs, |c| {
            (c.created_utc, c.mentions_keyword)
        }),
    }
}

fn filter_items<'a, T>(
    items: &'a [T],
    filter: &DashboardFilter,
    now_secs: i64,
    key: impl Fn(&T) -> (i64, bool),
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| {
            let (created_utc, mentions_keyword) = key(*item);
            filter.range.contains(created_utc, now_secs)
                && (!filter.keyword_only || mentions_keyword)
        })
        .collect()
}

pub fn compute_stats(activity: &FilteredActivity<'_>) -> DashboardStats {
    DashboardStats {
        upvotes: activity.posts.iter().map(|p| p.score).sum::<i64>()
            + activity.comments.iter().map(|c| c.score).sum::<i64>(),
        comments_received: activity.posts.iter().map(|p| p.num_comments).sum(),
        post_count: activity.posts.len(),
        comment_count: activity.comments.len(),
    }
}

/// Per-day totals, gap-filled with zero points through today in `now`'s zone.
///
/// A named range of N days yields exactly N points. Items kept by the
/// seconds cutoff that fall before the first of those days still count in
/// stats, rollup and feed but have no point here.
pub fn daily_series<Tz: TimeZone>(
    activity: &FilteredActivity<'_>,
    range: TimeRange,
    now: &DateTime<Tz>,
) -> Vec<DailyPoint> {
    let tz = now.timezone();
    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for post in &activity.posts {
        if let Some(day) = local_day(post.created_utc, &tz) {
            let entry = buckets.entry(day).or_default();
            entry.0 += post.score;
            entry.1 += post.num_comments;
        }
    }
    for comment in &activity.comments {
        if let Some(day) = local_day(comment.created_utc, &tz) {
            let entry = buckets.entry(day).or_default();
            entry.0 += comment.score;
            entry.1 += 1;
        }
    }

    let today = now.date_naive();
    let start = match range.days() {
        Some(days) => today - Days::new((days - 1).max(0) as u64),
        None => buckets
            .keys()
            .next()
            .copied()
            .unwrap_or(today - Days::new(ALL_RANGE_FALLBACK_DAYS - 1)),
    };

    start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|day| {
            let (upvotes, comments) = buckets.get(&day).copied().unwrap_or_default();
            DailyPoint {
                day,
                label: day.format("%b %-d").to_string(),
                upvotes,
                comments,
            }
        })
        .collect()
}

fn local_day<Tz: TimeZone>(created_utc: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(created_utc, 0).map(|dt| dt.with_timezone(tz).date_naive())
}

// Rollup sorted descending by `metric`; equal values keep first-seen order
// (posts are visited before comments).
pub fn subreddit_rollup(activity: &FilteredActivity<'_>, metric: Metric) -> Vec<SubredditStat> {
    let mut stats: Vec<SubredditStat> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for post in &activity.posts {
        let stat = rollup_slot(&mut stats, &mut index, &post.subreddit);
        stat.upvotes += post.score;
        stat.comments += post.num_comments;
        stat.count += 1;
    }
    for comment in &activity.comments {
        let stat = rollup_slot(&mut stats, &mut index, &comment.subreddit);
        stat.upvotes += comment.score;
        stat.count += 1;
    }
    match metric {
        Metric::Comments => stats.sort_by(|a, b| b.comments.cmp(&a.comments)),
        Metric::Upvotes | Metric::Impressions => stats.sort_by(|a, b| b.upvotes.cmp(&a.upvotes)),
    }
    stats
}

fn rollup_slot<'s, 'a>(
    stats: &'s mut Vec<SubredditStat>,
    index: &mut HashMap<&'a str, usize>,
    name: &'a str,
) -> &'s mut SubredditStat {
    let position = *index.entry(name).or_insert_with(|| {
        stats.push(SubredditStat {
            name: name.to_string(),
            upvotes: 0,
            comments: 0,
            count: 0,
        });
        stats.len() - 1
    });
    &mut stats[position]
}

// The sort is stable, so equal timestamps list posts before comments and
// otherwise keep snapshot order.
pub fn recent_activity(activity: &FilteredActivity<'_>, limit: usize) -> Vec<ActivityEntry> {
    let mut entries: Vec<ActivityEntry> =
        Vec::with_capacity(activity.posts.len() + activity.comments.len());
    entries.extend(activity.posts.iter().map(|post| ActivityEntry {
        kind: ActivityKind::Post,
        label: post.title.clone(),
        subreddit: post.subreddit.clone(),
        score: post.score,
        created_utc: post.created_utc,
        mentions_keyword: post.mentions_keyword,
        url: post.external_url(),
    }));
    entries.extend(activity.comments.iter().map(|comment| ActivityEntry {
        kind: ActivityKind::Comment,
        label: truncate_label(&comment.body, ACTIVITY_LABEL_MAX_CHARS),
        subreddit: comment.subreddit.clone(),
        score: comment.score,
        created_utc: comment.created_utc,
        mentions_keyword: comment.mentions_keyword,
        url: comment.external_url(),
    }));
    entries.sort_by(|a, b| b.created_utc.cmp(&a.created_utc));
    entries.truncate(limit);
    entries
}

fn truncate_label(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
