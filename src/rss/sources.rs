//! Configured feed sources per category.

use super::types::FeedSource;

/// Sources for a category; unknown categories fall back to general news.
pub fn sources_for(category: &str) -> &'static [FeedSource] {
    match category {
        "general" => GENERAL,
        "technology" => TECHNOLOGY,
        "business" => BUSINESS,
        "science" => SCIENCE,
        "health" => HEALTH,
        "sports" => SPORTS,
        "entertainment" => ENTERTAINMENT,
        "world" => WORLD,
        "politics" => POLITICS,
        "environment" => ENVIRONMENT,
        _ => GENERAL,
    }
}

const GENERAL: &[FeedSource] = &[
    FeedSource {
        name: "BBC News",
        url: "http://feeds.bbci.co.uk/news/rss.xml",
    },
    FeedSource {
        name: "NPR",
        url: "https://feeds.npr.org/1001/rss.xml",
    },
    FeedSource {
        name: "ABC News",
        url: "https://abcnews.go.com/abcnews/topstories",
    },
];

const TECHNOLOGY: &[FeedSource] = &[
    FeedSource {
        name: "Ars Technica",
        url: "https://feeds.arstechnica.com/arstechnica/index",
    },
    FeedSource {
        name: "The Verge",
        url: "https://www.theverge.com/rss/index.xml",
    },
    FeedSource {
        name: "TechCrunch",
        url: "https://techcrunch.com/feed/",
    },
];

const BUSINESS: &[FeedSource] = &[
    FeedSource {
        name: "BBC Business",
        url: "http://feeds.bbci.co.uk/news/business/rss.xml",
    },
    FeedSource {
        name: "CNBC",
        url: "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=10001147",
    },
];

const SCIENCE: &[FeedSource] = &[
    FeedSource {
        name: "BBC Science",
        url: "http://feeds.bbci.co.uk/news/science_and_environment/rss.xml",
    },
    FeedSource {
        name: "Space.com",
        url: "https://www.space.com/feeds/all",
    },
    FeedSource {
        name: "Live Science",
        url: "https://www.livescience.com/feeds/all",
    },
];

const HEALTH: &[FeedSource] = &[
    FeedSource {
        name: "BBC Health",
        url: "http://feeds.bbci.co.uk/news/health/rss.xml",
    },
    FeedSource {
        name: "Medical News Today",
        url: "https://www.medicalnewstoday.com/rss",
    },
];

const SPORTS: &[FeedSource] = &[
    FeedSource {
        name: "ESPN",
        url: "https://www.espn.com/espn/rss/news",
    },
    FeedSource {
        name: "BBC Sport",
        url: "http://feeds.bbci.co.uk/sport/rss.xml",
    },
];

const ENTERTAINMENT: &[FeedSource] = &[
    FeedSource {
        name: "BBC Entertainment",
        url: "http://feeds.bbci.co.uk/news/entertainment_and_arts/rss.xml",
    },
    FeedSource {
        name: "Variety",
        url: "https://variety.com/feed/",
    },
];

const WORLD: &[FeedSource] = &[
    FeedSource {
        name: "BBC World",
        url: "http://feeds.bbci.co.uk/news/world/rss.xml",
    },
    FeedSource {
        name: "Al Jazeera",
        url: "https://www.aljazeera.com/xml/rss/all.xml",
    },
];

const POLITICS: &[FeedSource] = &[
    FeedSource {
        name: "BBC Politics",
        url: "http://feeds.bbci.co.uk/news/politics/rss.xml",
    },
    FeedSource {
        name: "Politico",
        url: "https://www.politico.com/rss/politicopicks.xml",
    },
];

const ENVIRONMENT: &[FeedSource] = &[
    FeedSource {
        name: "BBC Environment",
        url: "http://feeds.bbci.co.uk/news/science_and_environment/rss.xml",
    },
    FeedSource {
        name: "Guardian Environment",
        url: "https://www.theguardian.com/environment/rss",
    },
];
