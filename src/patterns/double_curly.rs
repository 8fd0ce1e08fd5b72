//! `{{...}}` macro family: embeds, namespace/simple queries, cards, clozes,
//! query functions, video/tweet/youtube-timestamp embeds, renderers, and the
//! generic `macros` fallback.

use regex::Regex;

use crate::model::FeatureKey;

const UUID: &str = r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

pub struct DoubleCurlyPatterns {
    pub all: Regex,
    pub page_embed: Regex,
    pub block_embed: Regex,
    pub embed: Regex,
    pub namespace_query: Regex,
    pub card: Regex,
    pub cloze: Regex,
    pub simple_query: Regex,
    pub query_function: Regex,
    pub video_url: Regex,
    pub twitter_tweet: Regex,
    pub youtube_timestamp: Regex,
    pub renderer: Regex,
}

impl DoubleCurlyPatterns {
    #[must_use]
    pub fn compile() -> Self {
        Self {
            all: Regex::new(r"(?is)\{\{.*?\}\}").unwrap(),
            page_embed: Regex::new(r"(?is)\{\{embed\ \[\[.*?\]\]\}\}").unwrap(),
            block_embed: Regex::new(&format!(r"(?is)\{{\{{embed\ \(\({UUID}\)\)\}}\}}")).unwrap(),
            embed: Regex::new(r"(?is)\{\{embed\ .*?\}\}").unwrap(),
            namespace_query: Regex::new(r"(?is)\{\{namespace\ .*?\}\}").unwrap(),
            card: Regex::new(r"(?is)\{\{cards\ .*?\}\}").unwrap(),
            cloze: Regex::new(r"(?is)\{\{cloze\ .*?\}\}").unwrap(),
            simple_query: Regex::new(r"(?is)\{\{query\ .*?\}\}").unwrap(),
            query_function: Regex::new(r"(?is)\{\{function\ .*?\}\}").unwrap(),
            video_url: Regex::new(r"(?is)\{\{video\ .*?\}\}").unwrap(),
            twitter_tweet: Regex::new(r"(?is)\{\{tweet\ .*?\}\}").unwrap(),
            youtube_timestamp: Regex::new(r"(?is)\{\{youtube-timestamp\ .*?\}\}").unwrap(),
            renderer: Regex::new(r"(?is)\{\{renderer\ .*?\}\}").unwrap(),
        }
    }

    #[must_use]
    pub fn classify(&self, matched: &str) -> FeatureKey {
        if self.page_embed.is_match(matched) {
            FeatureKey::PageEmbeds
        } else if self.block_embed.is_match(matched) {
            FeatureKey::BlockEmbeds
        } else if self.embed.is_match(matched) {
            FeatureKey::Embeds
        } else if self.namespace_query.is_match(matched) {
            FeatureKey::NamespaceQueries
        } else if self.card.is_match(matched) {
            FeatureKey::Cards
        } else if self.cloze.is_match(matched) {
            FeatureKey::Clozes
        } else if self.simple_query.is_match(matched) {
            FeatureKey::SimpleQueries
        } else if self.query_function.is_match(matched) {
            FeatureKey::QueryFunctions
        } else if self.video_url.is_match(matched) {
            FeatureKey::VideoUrls
        } else if self.twitter_tweet.is_match(matched) {
            FeatureKey::TwitterTweets
        } else if self.youtube_timestamp.is_match(matched) {
            FeatureKey::YoutubeTimestamps
        } else if self.renderer.is_match(matched) {
            FeatureKey::Renderers
        } else {
            FeatureKey::Macros
        }
    }
}
