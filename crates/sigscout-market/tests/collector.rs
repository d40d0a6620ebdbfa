//! Integration tests for `MarketCollector` sub-source isolation and the
//! no-credentials simulated fallback.

use sigscout_core::sources::FeedConfig;
use sigscout_core::{Collector, SignalKind, TopicQuery};
use sigscout_market::MarketCollector;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> TopicQuery {
    TopicQuery::new("checkout flow", None).expect("valid query")
}

fn feed_body() -> String {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <item>
    <title>Checkout flow experiment results</title>
    <link>https://example.com/experiment</link>
    <description>The checkout flow experiment shipped to half of all traffic last week.</description>
    <pubDate>Tue, 25 Aug 2026 09:00:00 GMT</pubDate>
  </item>
  <item>
    <title>Short</title>
    <link>https://example.com/short</link>
    <description>tiny</description>
  </item>
  <item>
    <title>Kubernetes cluster maintenance window announced for next weekend</title>
    <link>https://example.com/infra</link>
    <description>Routine platform maintenance unrelated to commerce workstreams.</description>
  </item>
</channel></rss>"#
        .to_string()
}

#[tokio::test]
async fn no_credentials_yields_marked_simulated_signals() {
    let collector =
        MarketCollector::new(vec![], 30, None, None, 5, "sigscout-test").expect("collector");

    let collected = collector.collect(&query()).await.expect("should succeed");
    assert!(
        !collected.signals.is_empty(),
        "simulated fallback must produce signals"
    );
    for signal in &collected.signals {
        assert!(signal.is_simulated(), "expected simulated tag on {signal:?}");
        assert!((0.0..=1.0).contains(&signal.relevance_score));
        assert!((0.0..=1.0).contains(&signal.combined_score));
    }
}

#[tokio::test]
async fn feed_items_are_prefiltered_and_scored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_body()))
        .mount(&server)
        .await;

    let feeds = vec![FeedConfig {
        name: "eng-weekly".to_string(),
        url: format!("{}/feed.xml", server.uri()),
    }];
    let collector =
        MarketCollector::new(feeds, 30, None, None, 5, "sigscout-test").expect("collector");

    let collected = collector.collect(&query()).await.expect("should succeed");
    let feed_signals: Vec<_> = collected
        .signals
        .iter()
        .filter(|s| s.kind == SignalKind::FeedArticle)
        .collect();

    // The short item and the off-topic item must both be filtered out.
    assert_eq!(feed_signals.len(), 1, "got: {feed_signals:?}");
    assert_eq!(feed_signals[0].source_label, "eng-weekly");
    assert!(feed_signals[0].relevance_score > 0.0);
}

#[tokio::test]
async fn one_unreachable_feed_does_not_fail_the_collector() {
    // Scenario: the single configured feed errors while the search-style
    // sub-sources run simulated; the collector stays Success with signals
    // from the surviving sub-sources only.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let feeds = vec![FeedConfig {
        name: "broken-feed".to_string(),
        url: format!("{}/broken.xml", server.uri()),
    }];
    let collector =
        MarketCollector::new(feeds, 30, None, None, 5, "sigscout-test").expect("collector");

    let collected = collector.collect(&query()).await.expect("must not fail");
    assert!(!collected.signals.is_empty(), "other sub-sources must survive");
    assert!(
        collected
            .signals
            .iter()
            .all(|s| s.kind != SignalKind::FeedArticle),
        "broken feed must contribute nothing"
    );
}

#[tokio::test]
async fn one_broken_feed_leaves_other_feeds_intact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/good.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bad.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let feeds = vec![
        FeedConfig {
            name: "bad".to_string(),
            url: format!("{}/bad.xml", server.uri()),
        },
        FeedConfig {
            name: "good".to_string(),
            url: format!("{}/good.xml", server.uri()),
        },
    ];
    let collector =
        MarketCollector::new(feeds, 30, None, None, 5, "sigscout-test").expect("collector");

    let collected = collector.collect(&query()).await.expect("must not fail");
    assert!(collected
        .signals
        .iter()
        .any(|s| s.source_label == "good" && s.kind == SignalKind::FeedArticle));
}

#[tokio::test]
async fn results_are_ranked_and_truncated() {
    let collector =
        MarketCollector::new(vec![], 3, None, None, 5, "sigscout-test").expect("collector");

    let collected = collector.collect(&query()).await.expect("should succeed");
    assert!(collected.signals.len() <= 3);
    for pair in collected.signals.windows(2) {
        assert!(
            pair[0].combined_score >= pair[1].combined_score,
            "signals must be sorted by non-increasing combined score"
        );
    }
}
