use skyboard_core::{
    Coordinates, Dashboard, ErrorKind, LocationQuery, OpenWeatherClient, UnitSystem,
    WeatherError, WeatherProvider, group_by_day,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const CURRENT: &str = r#"
{
  "coord": {"lon": -0.1257, "lat": 51.5085},
  "weather": [
    {"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"},
    {"id": 701, "main": "Mist", "description": "mist", "icon": "50d"}
  ],
  "base": "stations",
  "main": {"temp": 11.6, "feels_like": 10.9, "temp_min": 10.2, "temp_max": 12.8,
           "pressure": 1009, "humidity": 81},
  "visibility": 10000,
  "wind": {"speed": 4.63, "deg": 240},
  "clouds": {"all": 75},
  "dt": 1680962700,
  "sys": {"type": 2, "id": 2075535, "country": "GB", "sunrise": 1680930415, "sunset": 1680978993},
  "timezone": 3600,
  "id": 2643743,
  "name": "London",
  "cod": 200
}
"#;

const FORECAST: &str = r#"
{
  "cod": "200",
  "message": 0,
  "cnt": 3,
  "list": [
    {"dt": 1680955200,
     "main": {"temp": 9.5, "feels_like": 8.0, "temp_min": 9.5, "temp_max": 10.1,
              "pressure": 1010, "sea_level": 1010, "grnd_level": 1006, "humidity": 76, "temp_kf": -0.6},
     "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
     "clouds": {"all": 75}, "wind": {"speed": 5.1, "deg": 230, "gust": 9.2},
     "visibility": 10000, "pop": 0.12, "sys": {"pod": "d"}, "dt_txt": "2023-04-08 12:00:00"},
    {"dt": 1680966000,
     "main": {"temp": 12.1, "feels_like": 11.0, "temp_min": 12.1, "temp_max": 12.1,
              "pressure": 1010, "sea_level": 1010, "grnd_level": 1006, "humidity": 70, "temp_kf": 0},
     "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
     "clouds": {"all": 90}, "wind": {"speed": 5.5, "deg": 235, "gust": 10.0},
     "visibility": 10000, "pop": 0.4, "sys": {"pod": "d"}, "dt_txt": "2023-04-08 15:00:00"},
    {"dt": 1680998400,
     "main": {"temp": 6.3, "feels_like": 4.0, "temp_min": 6.3, "temp_max": 6.3,
              "pressure": 1012, "sea_level": 1012, "grnd_level": 1008, "humidity": 88, "temp_kf": 0},
     "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01n"}],
     "clouds": {"all": 0}, "wind": {"speed": 2.1, "deg": 200, "gust": 3.0},
     "visibility": 10000, "pop": 0, "sys": {"pod": "n"}, "dt_txt": "2023-04-09 00:00:00"}
  ],
  "city": {"id": 2643743, "name": "London", "coord": {"lat": 51.5085, "lon": -0.1257},
           "country": "GB", "population": 1000000, "timezone": 3600,
           "sunrise": 1680930415, "sunset": 1680978993}
}
"#;

const GEOCODE: &str = r#"
[
  {"name": "Portland", "local_names": {"en": "Portland"}, "lat": 45.5202, "lon": -122.6742,
   "country": "US", "state": "Oregon"},
  {"name": "Portland", "lat": 43.6591, "lon": -70.2568, "country": "US", "state": "Maine"}
]
"#;

const REVERSE: &str = r#"
[{"name": "Kangini Bhavan", "lat": 12.97, "lon": 77.59, "country": "IN", "state": "Karnataka"}]
"#;

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new("TEST_KEY".to_string())
        .with_base_url(format!("{}/data/2.5", server.uri()))
        .with_geo_url(format!("{}/geo/1.0", server.uri()))
}

fn json(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

#[tokio::test]
async fn current_by_city_sends_units_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "imperial"))
        .respond_with(json(CURRENT))
        .expect(1)
        .mount(&server)
        .await;

    let current = client(&server)
        .current(&LocationQuery::City("London".into()), UnitSystem::Imperial)
        .await
        .expect("current weather");

    assert_eq!(current.name, "London");
    assert_eq!(current.country, "GB");
    assert_eq!(current.utc_offset, 3600);
    assert_eq!(current.sample.condition.code, 500);
    assert_eq!(current.sample.extra_conditions.len(), 1);
    assert_eq!(current.sample.pressure, 1009);
    assert_eq!(current.sample.wind_gust, None);
    assert!(current.is_daytime());
}

#[tokio::test]
async fn forecast_by_coordinates_keeps_text_timestamps() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "51.5085"))
        .and(query_param("lon", "-0.1257"))
        .and(query_param("units", "metric"))
        .respond_with(json(FORECAST))
        .mount(&server)
        .await;

    let query = LocationQuery::Coordinates(Coordinates { lat: 51.5085, lon: -0.1257 });
    let forecast = client(&server)
        .forecast(&query, UnitSystem::Metric)
        .await
        .expect("forecast");

    assert_eq!(forecast.city.utc_offset, 3600);
    assert_eq!(forecast.samples.len(), 3);
    assert_eq!(forecast.samples[0].text_timestamp.as_deref(), Some("2023-04-08 12:00:00"));
    assert_eq!(forecast.samples[1].precipitation_probability, Some(0.4));

    let days = group_by_day(&forecast.samples);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].condition.code, 803);
    assert_eq!(days[0].temp_max, 12.1);
    assert_eq!(days[0].temp_min, 9.5);
    assert_eq!(days[1].condition.code, 800);
}

#[tokio::test]
async fn non_success_weather_status_is_not_found() {
    let server = MockServer::start().await;

    // OpenWeather answers unknown cities with a JSON body and 404.
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(r#"{"cod":"404","message":"city not found"}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .current(&LocationQuery::City("Atlantis".into()), UnitSystem::Metric)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.to_string().contains("Atlantis"));
}

#[tokio::test]
async fn success_status_with_garbage_body_is_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(json("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .forecast(&LocationQuery::City("London".into()), UnitSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Parse { endpoint: "forecast", .. }));
    assert_eq!(err.kind(), ErrorKind::NetworkOrParseFailure);
}

#[tokio::test]
async fn geocode_keeps_upstream_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Portland"))
        .and(query_param("limit", "5"))
        .respond_with(json(GEOCODE))
        .mount(&server)
        .await;

    let found = client(&server).geocode("Portland").await.expect("candidates");
    let labels: Vec<String> = found.iter().map(|l| l.label()).collect();
    assert_eq!(labels, vec!["Portland, Oregon, US", "Portland, Maine, US"]);
}

#[tokio::test]
async fn geocode_failure_is_generic() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let err = client(&server).geocode("Portland").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NetworkOrParseFailure);
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn search_with_no_candidates_is_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(json("[]"))
        .mount(&server)
        .await;

    let dash = Dashboard::new(client(&server));
    let err = dash.search("Qwxyz").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResult);
}

#[tokio::test]
async fn reverse_geocode_asks_for_one_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("limit", "1"))
        .respond_with(json(REVERSE))
        .mount(&server)
        .await;

    let place = client(&server)
        .reverse_geocode(Coordinates { lat: 12.97, lon: 77.59 })
        .await
        .expect("reverse")
        .expect("one place");
    assert_eq!(place.name, "Kangini Bhavan");
}

#[tokio::test]
async fn dashboard_loads_coordinates_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(json(REVERSE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "12.97"))
        .respond_with(json(CURRENT))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "12.97"))
        .respond_with(json(FORECAST))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = skyboard_core::Config::default();
    cfg.aliases.insert("Kangini Bhavan".into(), "Bengaluru".into());

    let dash = Dashboard::from_config(client(&server), &cfg);
    let snap = dash
        .load_coordinates(Coordinates { lat: 12.97, lon: 77.59 })
        .await
        .expect("snapshot");

    assert_eq!(snap.current.name, "Bengaluru");
    assert_eq!(snap.forecast.samples.len(), 3);
}

#[tokio::test]
async fn joined_fetch_fails_when_forecast_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(json(CURRENT))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dash = Dashboard::new(client(&server));
    let err = dash.load_city("London").await.unwrap_err();
    assert!(matches!(err, WeatherError::NotFound { endpoint: "forecast", .. }));
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    // Bind and release a port so nothing is listening on it.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("free port");

    let client = OpenWeatherClient::new("TEST_KEY".to_string())
        .with_base_url(format!("http://{addr}/data/2.5"));

    let err = client
        .current(&LocationQuery::City("London".into()), UnitSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Network { endpoint: "weather", .. }));
    assert_eq!(err.kind(), ErrorKind::NetworkOrParseFailure);
}
