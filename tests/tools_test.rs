//! Tests for surf tools against mocked upstream APIs

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use surf_mcp::config::ProviderKind;
    use surf_mcp::provider::{self, Provider};
    use surf_mcp::reference::{ReferenceStore, PREFERENCES_FILE, SPOTS_FILE};
    use surf_mcp::tools::{all_tools, find_tool};
    use surf_mcp::{ConfigError, ServerConfig, Tool, ToolResult};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SG_KEY: &str = "sg-test-key";

    fn open_meteo_config(server: &MockServer) -> ServerConfig {
        ServerConfig {
            marine_url: format!("{}/v1", server.uri()),
            forecast_url: format!("{}/v1", server.uri()),
            upstream_timeout_secs: 5,
            ..ServerConfig::default()
        }
    }

    fn stormglass_config(server: &MockServer) -> ServerConfig {
        ServerConfig {
            provider: ProviderKind::Stormglass,
            api_key: Some(SG_KEY.into()),
            stormglass_url: format!("{}/v2", server.uri()),
            upstream_timeout_secs: 5,
            ..ServerConfig::default()
        }
    }

    fn write_reference(dir: &Path) {
        std::fs::write(
            dir.join(SPOTS_FILE),
            r#"{"Carcavelos": {"lat": 38.6756, "long": -9.3378}, "Guincho": {"lat": 38.7325, "long": -9.4728}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join(PREFERENCES_FILE),
            r#"{"waveHeight": {"min": 0.8, "max": 2.0, "preferred": 1.2}, "preferredBeaches": {"weekday": ["Carcavelos"], "weekend": ["Guincho"]}, "sessionTimes": {"weekday": ["07:00-09:00"], "weekend": ["08:00-12:00"]}, "skillLevel": "intermediate"}"#,
        )
        .unwrap();
    }

    fn tool_set(config: &ServerConfig, data_dir: &Path) -> Vec<Box<dyn Tool>> {
        let provider: Arc<dyn Provider> = provider::from_config(config).unwrap();
        all_tools(provider, ReferenceStore::new(data_dir))
    }

    async fn call(tools: &[Box<dyn Tool>], name: &str, args: Value) -> ToolResult {
        find_tool(tools, name).unwrap().execute(args).await.unwrap()
    }

    fn marine_body() -> Value {
        json!({
            "latitude": 38.675,
            "longitude": -9.3375,
            "generationtime_ms": 0.4,
            "utc_offset_seconds": 0,
            "timezone": "GMT",
            "daily_units": {
                "time": "iso8601",
                "wave_height_max": "m",
                "wave_direction_dominant": "°",
                "wave_period_max": "s"
            },
            "daily": {
                "time": ["2026-10-19", "2026-10-20"],
                "wave_height_max": [1.42, 1.8],
                "wave_direction_dominant": [292, 285],
                "wave_period_max": [12.4, 13.1]
            }
        })
    }

    // ==================== Registry ====================

    #[tokio::test]
    async fn test_registry_has_five_tools() {
        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&ServerConfig::default(), dir.path());
        let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            [
                "get_surf_spots_coordinates",
                "get_surf_preferences",
                "get_wave_forecast_week",
                "get_wind_forecast_week",
                "get_daily_tide_forecast",
            ]
        );
        let wave = find_tool(&tools, "get_wave_forecast_week").unwrap();
        assert_eq!(wave.schema()["required"], json!(["lat", "lng"]));
        assert!(wave.description().contains("wave_height_max"));
    }

    // ==================== Reference Tools ====================

    #[tokio::test]
    async fn test_spots_and_preferences_are_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path());
        let tools = tool_set(&ServerConfig::default(), dir.path());

        let spots = call(&tools, "get_surf_spots_coordinates", json!({})).await;
        assert_eq!(
            spots,
            ToolResult::ok(json!({
                "Carcavelos": {"lat": 38.6756, "long": -9.3378},
                "Guincho": {"lat": 38.7325, "long": -9.4728}
            }))
        );

        let prefs = call(&tools, "get_surf_preferences", json!({})).await.into_value();
        assert_eq!(prefs["skillLevel"], "intermediate");
        assert_eq!(prefs["preferredBeaches"]["weekend"], json!(["Guincho"]));
    }

    #[tokio::test]
    async fn test_missing_reference_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&ServerConfig::default(), dir.path());
        let err = find_tool(&tools, "get_surf_spots_coordinates")
            .unwrap()
            .execute(json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReferenceIo { .. }));
    }

    // ==================== Open-Meteo ====================

    #[tokio::test]
    async fn test_wave_forecast_passes_coordinates_and_body_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/marine"))
            .and(query_param("latitude", "38.6756"))
            .and(query_param("longitude", "-9.3378"))
            .and(query_param("daily", "wave_height_max,wave_direction_dominant,wave_period_max"))
            .respond_with(ResponseTemplate::new(200).set_body_json(marine_body()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&open_meteo_config(&server), dir.path());
        let result = call(&tools, "get_wave_forecast_week", json!({"lat": "38.6756", "lng": "-9.3378"})).await;
        assert_eq!(result, ToolResult::ok(marine_body()));
    }

    #[tokio::test]
    async fn test_wind_forecast_accepts_numbers() {
        let server = MockServer::start().await;
        let body = json!({
            "latitude": 38.75,
            "longitude": -9.5,
            "daily": {"time": ["2026-10-19"], "wind_speed_10m_max": [14.2], "wind_gusts_10m_max": [27.0], "wind_direction_10m_dominant": [135]}
        });
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "38.7325"))
            .and(query_param("longitude", "-9.4728"))
            .and(query_param("daily", "wind_speed_10m_max,wind_gusts_10m_max,wind_direction_10m_dominant"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&open_meteo_config(&server), dir.path());
        let result = call(&tools, "get_wind_forecast_week", json!({"lat": 38.7325, "lng": -9.4728})).await;
        assert_eq!(result, ToolResult::ok(body));
    }

    #[tokio::test]
    async fn test_body_without_marker_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/marine"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&open_meteo_config(&server), dir.path());
        let result = call(&tools, "get_wave_forecast_week", json!({"lat": "38.6756", "lng": "-9.3378"})).await;
        assert!(result.is_error());
        assert_eq!(result.into_value(), json!({"error": "Invalid API response format."}));
    }

    #[tokio::test]
    async fn test_non_numeric_input_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(marine_body()))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&open_meteo_config(&server), dir.path());
        let result = call(&tools, "get_wave_forecast_week", json!({"lat": "abc", "lng": "-9.3378"})).await;
        let error = result.into_value()["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Invalid args:"), "{error}");

        let result = call(&tools, "get_wind_forecast_week", json!({"lat": "38.6756"})).await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_tide_uses_fixed_region() {
        let server = MockServer::start().await;
        let body = json!({
            "latitude": 38.675,
            "longitude": -9.3375,
            "hourly": {"time": ["2026-10-19T00:00"], "sea_level_height_msl": [0.83]}
        });
        Mock::given(method("GET"))
            .and(path("/v1/marine"))
            .and(query_param("latitude", "38.6756"))
            .and(query_param("longitude", "-9.3378"))
            .and(query_param("hourly", "sea_level_height_msl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&open_meteo_config(&server), dir.path());
        // Arguments are ignored
        let first = call(&tools, "get_daily_tide_forecast", json!({})).await;
        let second = call(&tools, "get_daily_tide_forecast", json!({"lat": "0", "lng": "0"})).await;
        assert_eq!(first, ToolResult::ok(body));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&open_meteo_config(&server), dir.path());
        let result = call(&tools, "get_wave_forecast_week", json!({"lat": "38.6756", "lng": "-9.3378"})).await;
        let error = result.into_value()["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("API request failed: HTTP 500"), "{error}");
        assert!(error.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&open_meteo_config(&server), dir.path());
        let result = call(&tools, "get_daily_tide_forecast", json!({})).await;
        assert_eq!(result, ToolResult::err("Invalid JSON response from API."));
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(marine_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ServerConfig { upstream_timeout_secs: 1, ..open_meteo_config(&server) };
        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&config, dir.path());
        let result = call(&tools, "get_wave_forecast_week", json!({"lat": "38.6756", "lng": "-9.3378"})).await;
        assert_eq!(result, ToolResult::err("API request failed: timed out after 1s"));
    }

    // ==================== Stormglass ====================

    #[tokio::test]
    async fn test_stormglass_wave_sends_key_and_window() {
        let server = MockServer::start().await;
        let body = json!({
            "hours": [{"time": "2026-10-19T06:00:00+00:00", "waveHeight": {"sg": 1.4}, "swellPeriod": {"sg": 12.8}}],
            "meta": {"cost": 1, "dailyQuota": 10, "lat": 38.6756, "lng": -9.3378}
        });
        Mock::given(method("GET"))
            .and(path("/v2/weather/point"))
            .and(header("Authorization", SG_KEY))
            .and(query_param("lat", "38.6756"))
            .and(query_param("lng", "-9.3378"))
            .and(query_param(
                "params",
                "waveHeight,waveDirection,wavePeriod,swellHeight,swellDirection,swellPeriod",
            ))
            .and(query_param("source", "sg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&stormglass_config(&server), dir.path());
        let result = call(&tools, "get_wave_forecast_week", json!({"lat": "38.6756", "lng": "-9.3378"})).await;
        assert_eq!(result, ToolResult::ok(body));

        let requests = server.received_requests().await.unwrap();
        let query: std::collections::HashMap<String, String> =
            requests[0].url.query_pairs().into_owned().collect();
        let start: i64 = query["start"].parse().unwrap();
        let end: i64 = query["end"].parse().unwrap();
        assert!(start > chrono::Utc::now().timestamp());
        // Monday 06:00 to Sunday 21:00, give or take a DST hour
        let span = end - start;
        assert!((6 * 86400 + 14 * 3600..=6 * 86400 + 16 * 3600).contains(&span), "{span}");
    }

    #[tokio::test]
    async fn test_stormglass_wind_needs_hours_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/weather/point"))
            .and(query_param("params", "windSpeed,windDirection,gust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": {"key": "API quota exceeded"}})))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&stormglass_config(&server), dir.path());
        let result = call(&tools, "get_wind_forecast_week", json!({"lat": "38.6756", "lng": "-9.3378"})).await;
        assert_eq!(result, ToolResult::err("Invalid API response format."));
    }

    #[tokio::test]
    async fn test_stormglass_tide_extremes() {
        let server = MockServer::start().await;
        let body = json!({
            "data": [
                {"height": 1.21, "time": "2026-10-19T04:12:00+00:00", "type": "high"},
                {"height": -1.05, "time": "2026-10-19T10:31:00+00:00", "type": "low"}
            ],
            "meta": {"station": {"name": "cascais", "source": "sg"}}
        });
        Mock::given(method("GET"))
            .and(path("/v2/tide/extremes/point"))
            .and(header("Authorization", SG_KEY))
            .and(query_param("lat", "38.6756"))
            .and(query_param("lng", "-9.3378"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&stormglass_config(&server), dir.path());
        let result = call(&tools, "get_daily_tide_forecast", json!({})).await;
        assert_eq!(result, ToolResult::ok(body));
    }

    #[tokio::test]
    async fn test_stormglass_rejected_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"errors": {"key": "Unauthorized"}})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let tools = tool_set(&stormglass_config(&server), dir.path());
        let result = call(&tools, "get_daily_tide_forecast", json!({})).await;
        let error = result.into_value()["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("API request failed: HTTP 401"), "{error}");
    }

    // ==================== End to end ====================

    #[tokio::test]
    async fn test_carcavelos_planning_flow() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/marine"))
            .and(query_param("latitude", "38.6756"))
            .and(query_param("longitude", "-9.3378"))
            .respond_with(ResponseTemplate::new(200).set_body_json(marine_body()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        write_reference(dir.path());
        let tools = tool_set(&open_meteo_config(&server), dir.path());

        // An agent looks the spot up, then asks for its waves with string coordinates
        let spots = call(&tools, "get_surf_spots_coordinates", json!({})).await.into_value();
        let carcavelos = &spots["Carcavelos"];
        let args = json!({
            "lat": carcavelos["lat"].to_string(),
            "lng": carcavelos["long"].to_string()
        });
        assert_eq!(args, json!({"lat": "38.6756", "lng": "-9.3378"}));

        let waves = call(&tools, "get_wave_forecast_week", args).await;
        assert!(!waves.is_error());
        let waves = waves.into_value();
        assert_eq!(waves["daily"]["wave_height_max"][0], 1.42);
        assert_eq!(waves["daily"]["wave_period_max"][0], 12.4);
    }
}
