//! Pixel emitter against a mock HTTP endpoint

use prerender_conf::Environment;
use prerender_stats::{CACHE_MISS, PixelStatEmitter, STAT_GROUP, StatEmitter};
use rstest::rstest;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn wait_for_requests(server: &MockServer, expected: usize) -> usize {
	let deadline = Instant::now() + Duration::from_secs(5);
	loop {
		let received = server.received_requests().await.map_or(0, |r| r.len());
		if received >= expected || Instant::now() >= deadline {
			return received;
		}
		tokio::time::sleep(Duration::from_millis(10)).await;
	}
}

#[rstest]
#[tokio::test]
async fn test_production_emitter_hits_pixel() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/g.gif"))
		.and(query_param("v", "wpcom-no-pv"))
		.and(query_param("x_ssr", "cache-miss"))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount(&server)
		.await;
	let endpoint = format!("{}/g.gif", server.uri());
	let emitter = PixelStatEmitter::new(&endpoint, &Environment::Production).unwrap();

	// Act
	emitter.emit(STAT_GROUP, CACHE_MISS);

	// Assert
	assert_eq!(wait_for_requests(&server, 1).await, 1);
}

#[rstest]
#[tokio::test]
async fn test_development_emitter_sends_nothing() {
	// Arrange
	let server = MockServer::start().await;
	let endpoint = format!("{}/g.gif", server.uri());
	let emitter = PixelStatEmitter::new(&endpoint, &Environment::Development).unwrap();

	// Act
	emitter.emit(STAT_GROUP, CACHE_MISS);
	tokio::time::sleep(Duration::from_millis(100)).await;

	// Assert
	assert_eq!(server.received_requests().await.map_or(0, |r| r.len()), 0);
}

#[rstest]
#[tokio::test]
async fn test_slow_endpoint_does_not_block_caller() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
		.mount(&server)
		.await;
	let endpoint = format!("{}/g.gif", server.uri());
	let emitter = PixelStatEmitter::new(&endpoint, &Environment::Production).unwrap();

	// Act
	let started = Instant::now();
	emitter.emit(STAT_GROUP, CACHE_MISS);
	let elapsed = started.elapsed();

	// Assert
	assert!(elapsed < Duration::from_millis(500), "emit blocked for {:?}", elapsed);
}

#[rstest]
#[tokio::test]
async fn test_failing_endpoint_is_absorbed() {
	// Arrange
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.respond_with(ResponseTemplate::new(500))
		.mount(&server)
		.await;
	let endpoint = format!("{}/g.gif", server.uri());
	let emitter = PixelStatEmitter::new(&endpoint, &Environment::Production).unwrap();

	// Act
	emitter.emit(STAT_GROUP, CACHE_MISS);
	emitter.emit(STAT_GROUP, CACHE_MISS);

	// Assert
	assert_eq!(wait_for_requests(&server, 2).await, 2);
}

#[rstest]
#[tokio::test]
async fn test_unreachable_endpoint_is_absorbed() {
	let emitter = PixelStatEmitter::new("http://127.0.0.1:9/g.gif", &Environment::Production).unwrap();

	emitter.emit(STAT_GROUP, CACHE_MISS);
	tokio::time::sleep(Duration::from_millis(50)).await;
}
