// Startup selection of address and coordinate implementations.

#[cfg(test)]
mod test {

    use std::sync::Arc;

    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    use crate::client::factory::PersonsClientFactory;
    use crate::config::employees::{EmployeeAddress, EmployeeCoordinate, EmployeesConfig, NominatimConfig};
    use crate::config::services::ServicesConfiguration;
    use crate::config::sources::{CoordinateSource, EmployeeAddressesSource};
    use crate::error::ComposeError;
    use crate::observability::metrics::get_metrics;
    use crate::providers::selector::{select_address_provider, select_coordinate_provider, ProviderContext};
    use crate::providers::{EmployeeAddressesProvider, EmployeeCoordinatesProvider};
    use crate::tests::common::{build_reqwest_client, StaticTokenProvider};

    fn address(id: &str, street: &str) -> EmployeeAddress {
        EmployeeAddress {
            employee_id: id.into(),
            name: format!("Employee {}", id),
            street: street.into(),
            postal_code: "70173".into(),
            city: "Stuttgart".into(),
            country: Some("Germany".into()),
        }
    }

    fn employees() -> EmployeesConfig {
        EmployeesConfig {
            addresses: vec![address("e1", "Hauptstr. 1"), address("e2", "Nirgendwo 0")],
            coordinates: vec![EmployeeCoordinate {
                employee_id: "e1".into(),
                name: "Employee e1".into(),
                latitude: 48.7758,
                longitude: 9.1829,
            }],
        }
    }

    fn factory(token: &str) -> Arc<PersonsClientFactory<StaticTokenProvider>> {
        Arc::new(PersonsClientFactory::new(
            ServicesConfiguration::new(None, "https://{service}.internal/api"),
            build_reqwest_client(),
            Arc::new(StaticTokenProvider::returning(token)),
        ))
    }

    #[tokio::test]
    async fn known_selectors_pick_their_implementations() {
        let http = build_reqwest_client();
        let employees = employees();
        let nominatim = NominatimConfig::default();
        let persons_clients = factory("tok");
        let ctx = ProviderContext {
            http: &http,
            user_agent: "dashboard-composer-test",
            employees: &employees,
            nominatim: &nominatim,
            persons_clients: &persons_clients,
            metrics: get_metrics().await,
        };

        let addresses = Arc::new(select_address_provider(&EmployeeAddressesSource::ObsStamm, &ctx));
        assert_eq!(addresses.name(), "obsstamm");

        let coordinates = select_coordinate_provider(&CoordinateSource::Nominatim, &ctx, Arc::clone(&addresses));
        assert_eq!(coordinates.name(), "nominatim");

        let addresses = Arc::new(select_address_provider(&EmployeeAddressesSource::Configuration, &ctx));
        assert_eq!(addresses.name(), "configuration");

        let coordinates = select_coordinate_provider(&CoordinateSource::Configuration, &ctx, addresses);
        assert_eq!(coordinates.name(), "configuration");
    }

    #[tokio::test]
    async fn unrecognized_selectors_fall_back_to_configuration() {
        let http = build_reqwest_client();
        let employees = employees();
        let nominatim = NominatimConfig::default();
        let persons_clients = factory("tok");
        let ctx = ProviderContext {
            http: &http,
            user_agent: "dashboard-composer-test",
            employees: &employees,
            nominatim: &nominatim,
            persons_clients: &persons_clients,
            metrics: get_metrics().await,
        };

        let addresses = Arc::new(select_address_provider(
            &EmployeeAddressesSource::Unrecognized("Ldap".into()),
            &ctx,
        ));
        let coordinates = select_coordinate_provider(
            &CoordinateSource::Unrecognized("GoogleMaps".into()),
            &ctx,
            Arc::clone(&addresses),
        );
        assert_eq!(addresses.name(), "configuration");
        assert_eq!(coordinates.name(), "configuration");

        let cancel = CancellationToken::new();
        assert_eq!(addresses.employee_addresses(&cancel).await.unwrap(), employees.addresses);
        assert_eq!(coordinates.employee_coordinates(&cancel).await.unwrap(), employees.coordinates);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn nominatim_geocodes_configured_addresses_and_skips_unknown_ones() {
        let server = MockServer::start_async().await;
        let found = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("q", "Hauptstr. 1, 70173 Stuttgart, Germany")
                    .query_param("format", "json")
                    .query_param("limit", "1")
                    .header("user-agent", "dashboard-composer-test");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!([
                        {"lat": "48.7758", "lon": "9.1829", "display_name": "Hauptstraße 1, Stuttgart"}
                    ]));
            })
            .await;
        let unknown = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/search")
                    .query_param("q", "Nirgendwo 0, 70173 Stuttgart, Germany");
                then.status(200).header("Content-Type", "application/json").json_body(json!([]));
            })
            .await;

        let http = build_reqwest_client();
        let employees = employees();
        let nominatim = NominatimConfig {
            base_url: server.base_url(),
            user_agent: Some("dashboard-composer-test".into()),
        };
        let persons_clients = factory("tok");
        let ctx = ProviderContext {
            http: &http,
            user_agent: "fallback-agent",
            employees: &employees,
            nominatim: &nominatim,
            persons_clients: &persons_clients,
            metrics: get_metrics().await,
        };

        let addresses = Arc::new(select_address_provider(&EmployeeAddressesSource::Configuration, &ctx));
        let coordinates = select_coordinate_provider(&CoordinateSource::Nominatim, &ctx, addresses);

        let result = coordinates.employee_coordinates(&CancellationToken::new()).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].employee_id, "e1");
        assert!((result[0].latitude - 48.7758).abs() < 1e-9);
        assert!((result[0].longitude - 9.1829).abs() < 1e-9);

        found.assert_hits_async(1).await;
        unknown.assert_hits_async(1).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn nominatim_failure_is_an_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(500);
            })
            .await;

        let http = build_reqwest_client();
        let employees = employees();
        let nominatim = NominatimConfig { base_url: server.base_url(), user_agent: None };
        let persons_clients = factory("tok");
        let ctx = ProviderContext {
            http: &http,
            user_agent: "fallback-agent",
            employees: &employees,
            nominatim: &nominatim,
            persons_clients: &persons_clients,
            metrics: get_metrics().await,
        };

        let addresses = Arc::new(select_address_provider(&EmployeeAddressesSource::Configuration, &ctx));
        let coordinates = select_coordinate_provider(&CoordinateSource::Nominatim, &ctx, addresses);

        let result = coordinates.employee_coordinates(&CancellationToken::new()).await;
        assert!(matches!(result, Err(ComposeError::Upstream(_))));
    }

    #[tokio::test]
    async fn cancelled_geocoding_stops_before_any_request() {
        let http = build_reqwest_client();
        let employees = employees();
        // nothing listens here; a request would fail as upstream error instead
        let nominatim = NominatimConfig { base_url: "http://127.0.0.1:9".into(), user_agent: None };
        let persons_clients = factory("tok");
        let ctx = ProviderContext {
            http: &http,
            user_agent: "fallback-agent",
            employees: &employees,
            nominatim: &nominatim,
            persons_clients: &persons_clients,
            metrics: get_metrics().await,
        };

        let addresses = Arc::new(select_address_provider(&EmployeeAddressesSource::Configuration, &ctx));
        let coordinates = select_coordinate_provider(&CoordinateSource::Nominatim, &ctx, addresses);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = coordinates.employee_coordinates(&cancel).await;
        assert!(result.is_err_and(|e| e.is_cancelled()));
    }
}
