//! Integration tests for [`BrregClient`] against a mock registry.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use brreg::{BrregClient, EnhetOppslag, EnhetQuery, ErrorKind, OppdateringQuery};

fn client_for(server: &MockServer) -> BrregClient {
    BrregClient::builder().base_url(server.uri()).build().unwrap()
}

fn test_company() -> serde_json::Value {
    json!({
        "organisasjonsnummer": "987654321",
        "navn": "Test Company AS",
        "organisasjonsform": {
            "kode": "AS",
            "beskrivelse": "Aksjeselskap"
        },
        "forretningsadresse": {
            "adresse": ["Testveien 1"],
            "postnummer": "0150",
            "poststed": "OSLO",
            "kommune": "OSLO",
            "kommunenummer": "0301"
        },
        "antallAnsatte": 42,
        "registrertIMvaregisteret": true,
        "_links": {
            "self": { "href": "https://data.brreg.no/enhetsregisteret/api/enheter/987654321" }
        }
    })
}

// =============================================================================
// Entity lookups
// =============================================================================

#[tokio::test]
async fn get_enhet_decodes_active_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter/987654321"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_company()))
        .expect(1)
        .mount(&server)
        .await;

    let oppslag = client_for(&server).get_enhet("987654321").await.unwrap();
    let enhet = oppslag.as_aktiv().expect("active entity");
    assert_eq!(enhet.navn, "Test Company AS");
    assert_eq!(enhet.antall_ansatte, Some(42));
    assert_eq!(enhet.registrert_i_mvaregisteret, Some(true));
    assert_eq!(enhet.organisasjonsform.as_ref().unwrap().kode, "AS");
    let adresse = enhet.forretningsadresse.as_ref().unwrap();
    assert_eq!(adresse.kommunenummer.as_deref(), Some("0301"));
    assert!(enhet.links.contains_key("self"));
}

#[tokio::test]
async fn get_enhet_not_found_carries_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter/123456789"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "timestamp": "2024-03-01T10:00:00.000+00:00",
            "status": 404,
            "error": "Not Found"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_enhet("123456789")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status_code(), Some(404));
    assert!(err.request_url().unwrap().ends_with("/enheter/123456789"));
    assert_eq!(err.response_json().unwrap()["error"], "Not Found");
}

#[tokio::test]
async fn get_enhet_recognizes_deleted_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter/123456780"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organisasjonsnummer": "123456780",
            "navn": "Deleted Company AS",
            "slettedato": "2024-02-15",
            "respons_klasse": "SlettetEnhet"
        })))
        .mount(&server)
        .await;

    let oppslag = client_for(&server).get_enhet("123456780").await.unwrap();
    assert!(oppslag.is_slettet());
    assert_eq!(oppslag.organisasjonsnummer(), "123456780");
    match oppslag {
        EnhetOppslag::Slettet(slettet) => {
            assert_eq!(slettet.slettedato.as_deref(), Some("2024-02-15"));
        }
        EnhetOppslag::Aktiv(_) => panic!("expected a deleted entity"),
    }
}

#[tokio::test]
async fn invalid_organisasjonsnummer_never_reaches_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for bad in ["", "   ", "../roller", "98765/4321"] {
        let err = client.get_enhet(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "input {bad:?}");
    }
}

#[tokio::test]
async fn malformed_body_is_a_data_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter/987654321"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_enhet("987654321")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(!err.is_transient());
}

#[tokio::test]
async fn get_underenhet_decodes_sub_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/underenheter/876543219"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organisasjonsnummer": "876543219",
            "navn": "Test Company AS avd Bergen",
            "overordnetEnhet": "987654321",
            "beliggenhetsadresse": { "adresse": ["Bryggen 1"], "kommunenummer": "4601" }
        })))
        .mount(&server)
        .await;

    let oppslag = client_for(&server)
        .get_underenhet("876543219")
        .await
        .unwrap();
    assert!(!oppslag.is_slettet());
    let underenhet = oppslag.into_aktiv().unwrap();
    assert_eq!(underenhet.overordnet_enhet.as_deref(), Some("987654321"));
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn search_sends_only_set_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter"))
        .and(query_param("navn", "Test Search"))
        .and(query_param("size", "5"))
        .and(query_param("organisasjonsform", "AS,ASA"))
        .and(query_param_is_missing("kommunenummer"))
        .and(query_param_is_missing("konkurs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": { "enheter": [test_company()] },
            "page": { "size": 5, "totalElements": 1, "totalPages": 1, "number": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = EnhetQuery::new()
        .navn("Test Search")
        .organisasjonsform(["AS", "ASA"])
        .size(5);
    let page = client_for(&server).search_enheter(&query).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page.total_elements(), Some(1));
    assert!(!page.page.as_ref().unwrap().has_next());
    assert_eq!(page.items[0].navn, "Test Company AS");
}

#[tokio::test]
async fn search_without_hits_is_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": { "size": 20, "totalElements": 0, "totalPages": 0, "number": 0 }
        })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search_enheter(&EnhetQuery::new().navn("Finnes Ikke"))
        .await
        .unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_elements(), Some(0));
}

// =============================================================================
// Code lists and roles
// =============================================================================

#[tokio::test]
async fn code_lists_accept_hal_and_bare_arrays() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kodeverk/naeringskoder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": {
                "naeringskoder": [
                    { "kode": "01.110", "beskrivelse": "Dyrking av korn" },
                    { "kode": "62.010", "beskrivelse": "Programmeringstjenester" }
                ]
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/kodeverk/sektorkoder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "kode": "2100", "beskrivelse": "Private aksjeselskaper mv." }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let naering = client.naeringskoder().await.unwrap();
    assert_eq!(naering.len(), 2);
    assert_eq!(naering[1].kode, "62.010");

    let sektor = client.sektorkoder().await.unwrap();
    assert_eq!(sektor.len(), 1);
    assert_eq!(sektor[0].beskrivelse.as_deref(), Some("Private aksjeselskaper mv."));
}

#[tokio::test]
async fn get_kommune_and_organisasjonsform() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kommuner/0301"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "nummer": "0301", "navn": "OSLO" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/organisasjonsformer/ANS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kode": "ANS",
            "beskrivelse": "Ansvarlig selskap med solidarisk ansvar"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.get_kommune("0301").await.unwrap().navn, "OSLO");
    let form = client.get_organisasjonsform("ANS").await.unwrap();
    assert!(!form.is_utgaatt());
}

#[tokio::test]
async fn get_enhet_roller_decodes_groups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter/987654321/roller"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rollegrupper": [{
                "type": { "kode": "DAGL", "beskrivelse": "Daglig leder/ adm.direktør" },
                "sistEndret": "2024-01-10",
                "roller": [{
                    "type": { "kode": "DAGL", "beskrivelse": "Daglig leder/ adm.direktør" },
                    "person": {
                        "fodselsdato": "1970-01-01",
                        "navn": { "fornavn": "Kari", "etternavn": "Nordmann" },
                        "erDoed": false
                    },
                    "fratraadt": false,
                    "rekkefolge": 0
                }]
            }, {
                "type": { "kode": "REVI", "beskrivelse": "Revisor" },
                "roller": [{
                    "type": { "kode": "REVI", "beskrivelse": "Revisor" },
                    "enhet": {
                        "organisasjonsnummer": "111111111",
                        "navn": ["Revisjon AS"],
                        "erSlettet": false
                    }
                }]
            }]
        })))
        .mount(&server)
        .await;

    let roller = client_for(&server)
        .get_enhet_roller("987654321")
        .await
        .unwrap();
    assert_eq!(roller.rollegrupper.len(), 2);
    assert_eq!(roller.iter().count(), 2);

    let dagl: Vec<_> = roller.by_type("DAGL").collect();
    assert_eq!(dagl.len(), 1);
    let navn = dagl[0].person.as_ref().unwrap().navn.as_ref().unwrap();
    assert_eq!(navn.fullt_navn(), "Kari Nordmann");

    let revisor = roller.by_type("REVI").next().unwrap();
    assert_eq!(revisor.enhet.as_ref().unwrap().organisasjonsnummer, "111111111");
}

// =============================================================================
// Downloads and feeds
// =============================================================================

#[tokio::test]
async fn csv_download_negotiates_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/enheter/lastned/csv"))
        .and(header("accept", "text/csv"))
        .and(query_param("kommunenummer", "0301"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string("organisasjonsnummer,navn\n987654321,Test Company AS\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .download_enheter_csv(&EnhetQuery::new().kommunenummer("0301"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.content_type(), Some("text/csv"));
    assert!(response.text().contains("Test Company AS"));
}

#[tokio::test]
async fn enhet_oppdateringer_reads_change_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oppdateringer/enheter"))
        .and(query_param("dato", "2024-01-01T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_embedded": {
                "oppdaterteEnheter": [{
                    "oppdateringsid": 17,
                    "dato": "2024-01-01T06:00:00.000Z",
                    "organisasjonsnummer": "987654321",
                    "endringstype": "Endring"
                }]
            },
            "page": { "size": 20, "totalElements": 1, "totalPages": 1, "number": 0 }
        })))
        .mount(&server)
        .await;

    let feed = client_for(&server)
        .enhet_oppdateringer(&OppdateringQuery::new().dato("2024-01-01T00:00:00.000Z"))
        .await
        .unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed.items[0].oppdateringsid, 17);
    assert_eq!(feed.items[0].endringstype.as_deref(), Some("Endring"));
}

#[tokio::test]
async fn server_error_without_retries_surfaces_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kommuner"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).kommuner().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.response_text(), Some("Bad Gateway"));
}
