use async_trait::async_trait;
use carrier_dispatch::{
    fetch_manifest, AttachmentStore, CarrierApi, CarrierGateway, CarrierMethod, DispatchConfig,
    DispatchOrchestrator, GatewayRegistry, LabelBundle, PrintFlow, Result, SendOutcome, Shipment,
    ShipmentKind, ShipmentState,
};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const CONFIG: &str = r#"
archive_prefix = "acme"
attach_label = true

[[carrier_api]]
name = "Seur"
method = "seur"
carriers = ["seur"]
excluded_postal_codes = ["07001"]
endpoint = "https://ws.seur.example/shipping"

[[carrier_api]]
name = "MRW"
method = "mrw"
carriers = ["mrw"]
"#;

struct FakeCarrier {
    label_dir: TempDir,
}

#[async_trait]
impl CarrierGateway for FakeCarrier {
    async fn send(&self, _api: &CarrierApi, shipment: &mut Shipment) -> Result<SendOutcome> {
        let reference = format!("TRK-{}", shipment.number);
        shipment.tracking_ref = Some(reference.clone());

        let path = self.label_dir.path().join(format!("{}.pdf", reference));
        std::fs::write(&path, format!("label {}", reference))?;

        Ok(SendOutcome {
            references: vec![reference],
            labels: vec![path],
            errors: vec![],
        })
    }

    async fn print_labels(&self, _api: &CarrierApi, shipment: &Shipment) -> Result<Vec<PathBuf>> {
        let reference = shipment.tracking_ref.clone().unwrap_or_default();
        let path = self.label_dir.path().join(format!("{}-reprint.pdf", reference));
        std::fs::write(&path, format!("reprint {}", reference))?;
        Ok(vec![path])
    }

    async fn get_manifest(
        &self,
        _api: &CarrierApi,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<u8>> {
        Ok(format!("manifest {} .. {}", from, to).into_bytes())
    }
}

#[derive(Default)]
struct RecordingStore {
    attached: Mutex<Vec<String>>,
}

#[async_trait]
impl AttachmentStore for RecordingStore {
    async fn attach(&self, resource: &str, _name: &str, _data: &[u8]) -> Result<()> {
        self.attached.lock().unwrap().push(resource.to_string());
        Ok(())
    }
}

fn packed_shipment(number: &str) -> Shipment {
    let mut s = Shipment::new(number, ShipmentKind::Outgoing, ShipmentState::Packed);
    s.carrier = Some("seur".to_string());
    s.delivery_address.street = Some("C/ Mallorca 1".to_string());
    s.delivery_address.postal_code = Some("08024".to_string());
    s.delivery_address.city = Some("Barcelona".to_string());
    s.delivery_address.country = Some("ES".to_string());
    s
}

fn registry() -> Arc<GatewayRegistry> {
    Arc::new(GatewayRegistry::new().with_gateway(
        CarrierMethod::Seur,
        Arc::new(FakeCarrier {
            label_dir: TempDir::new().unwrap(),
        }),
    ))
}

#[tokio::test]
async fn test_end_to_end_dispatch_batch() {
    let config = DispatchConfig::from_toml_str(CONFIG).unwrap();
    let orchestrator = DispatchOrchestrator::new(config, registry());

    let mut shipments = vec![
        packed_shipment("S001"),
        packed_shipment("S002"),
        packed_shipment("S003"),
    ];

    let outcome = orchestrator.dispatch(&mut shipments).await.unwrap();

    assert_eq!(outcome.references, vec!["TRK-S001", "TRK-S002", "TRK-S003"]);
    assert!(outcome.errors.is_empty());
    assert!(shipments.iter().all(|s| s.tracking_ref.is_some()));
    assert!(shipments.iter().all(|s| s.send_date.is_some()));

    // Three labels must come back as one gzip tar holding exactly them.
    let (file_name, data) = match outcome.labels {
        LabelBundle::Archive { file_name, data } => (file_name, data),
        other => panic!("expected archive, got {:?}", other),
    };
    assert_eq!(file_name, "acme-labels.tgz");

    let mut archive = tar::Archive::new(GzDecoder::new(data.as_slice()));
    let mut names: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["TRK-S001.pdf", "TRK-S002.pdf", "TRK-S003.pdf"]);
}

#[tokio::test]
async fn test_end_to_end_mixed_batch_keeps_going() {
    let config = DispatchConfig::from_toml_str(CONFIG).unwrap();
    let orchestrator = DispatchOrchestrator::new(config, registry());

    let mut shipments = vec![packed_shipment("S001"), packed_shipment("S002")];
    shipments[1].delivery_address.street = None;

    let outcome = orchestrator.dispatch(&mut shipments).await.unwrap();

    assert_eq!(outcome.references, vec!["TRK-S001"]);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("S002"));
    assert!(outcome.summary.contains("TRK-S001"));
    assert!(outcome.summary.contains("street"));
}

#[tokio::test]
async fn test_end_to_end_preflight_blocks_duplicates() {
    let config = DispatchConfig::from_toml_str(CONFIG).unwrap();
    let orchestrator = DispatchOrchestrator::new(config, registry());

    let mut shipments = vec![packed_shipment("S001")];
    shipments[0].tracking_ref = Some("TRK-EXISTING".to_string());

    let err = orchestrator.dispatch(&mut shipments).await.unwrap_err();
    assert!(err.to_string().contains("already sent"));
    assert!(shipments[0].send_date.is_none());
}

#[tokio::test]
async fn test_end_to_end_print_flow_with_attachments() {
    let config = DispatchConfig::from_toml_str(CONFIG).unwrap();
    let store = Arc::new(RecordingStore::default());
    let flow = PrintFlow::new(config, registry()).with_attachment_store(store.clone());

    let mut shipments = vec![packed_shipment("S001")];
    shipments[0].tracking_ref = Some("TRK-S001".to_string());

    let bundle = flow.run(&mut shipments).await.unwrap();

    match bundle {
        LabelBundle::Single { file_name, data } => {
            assert_eq!(file_name, "TRK-S001-reprint.pdf");
            assert_eq!(data, b"reprint TRK-S001");
        }
        other => panic!("expected single label, got {:?}", other),
    }
    assert!(shipments[0].printed);
    assert_eq!(*store.attached.lock().unwrap(), vec!["S001"]);
}

#[tokio::test]
async fn test_end_to_end_manifest_flow() {
    let config = DispatchConfig::from_toml_str(CONFIG).unwrap();
    let registry = registry();

    let from = "2024-06-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
    let to = "2024-06-02T00:00:00Z".parse::<DateTime<Utc>>().unwrap();

    // The Seur API has a registered gateway; MRW does not.
    let seur = fetch_manifest(&registry, &config.carrier_apis[0], from, to)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seur.file_name, "seur-manifest-20240601-20240602.pdf");
    assert!(String::from_utf8(seur.data).unwrap().starts_with("manifest"));

    let mrw = fetch_manifest(&registry, &config.carrier_apis[1], from, to)
        .await
        .unwrap();
    assert!(mrw.is_none());
}
