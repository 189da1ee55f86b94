use super::domain::{Bundle, BundlePurchase, BundleService, PurchaseState};
use crate::portal::applications::seed::day;
use crate::portal::applications::Sector;

fn service(id: &str, name: &str, agency: &str, sla_days: u32, fee: u64) -> BundleService {
    BundleService {
        id: id.to_string(),
        name: name.to_string(),
        agency: agency.to_string(),
        sla_days,
        standalone_fee_bdt: fee,
    }
}

fn name_clearance() -> BundleService {
    service("SRV-001", "Company name clearance", "RJSC", 2, 1_500)
}

fn incorporation() -> BundleService {
    service("SRV-002", "Company incorporation", "RJSC", 5, 12_000)
}

fn environmental_clearance() -> BundleService {
    service("SRV-005", "Environmental clearance certificate", "DOE", 30, 50_000)
}

fn fire_licence() -> BundleService {
    service("SRV-006", "Fire safety licence", "FSCD", 14, 25_000)
}

fn power_connection() -> BundleService {
    service("SRV-007", "Industrial power connection", "DPDC", 21, 40_000)
}

pub(crate) fn bundles() -> Vec<Bundle> {
    vec![
        Bundle {
            id: "BUNDLE-001".to_string(),
            name: "Company Start-Up Bundle".to_string(),
            description: "Name clearance through VAT registration for a new private limited company"
                .to_string(),
            sector: None,
            services: vec![
                name_clearance(),
                incorporation(),
                service("SRV-003", "e-TIN registration", "NBR", 3, 500),
                service("SRV-004", "VAT registration (BIN)", "NBR", 5, 1_500),
            ],
            price_bdt: 13_500,
        },
        Bundle {
            id: "BUNDLE-002".to_string(),
            name: "Factory Setup Bundle".to_string(),
            description: "Site clearances and utility connection for a new production facility"
                .to_string(),
            sector: Some(Sector::Manufacturing),
            services: vec![environmental_clearance(), fire_licence(), power_connection()],
            price_bdt: 100_000,
        },
        Bundle {
            id: "BUNDLE-003".to_string(),
            name: "Export Readiness Bundle".to_string(),
            description: "Registrations an RMG exporter needs before the first shipment"
                .to_string(),
            sector: Some(Sector::Textiles),
            services: vec![
                service("SRV-008", "Export registration certificate", "CCIE", 7, 8_000),
                service("SRV-009", "Bonded warehouse licence", "NBR", 10, 30_000),
                fire_licence(),
            ],
            price_bdt: 55_000,
        },
        Bundle {
            id: "BUNDLE-004".to_string(),
            name: "Economic Zone Entry Bundle".to_string(),
            description: "Plot allotment and clearances inside a BEZA economic zone".to_string(),
            sector: Some(Sector::Infrastructure),
            services: vec![
                service("SRV-011", "Economic zone plot allotment", "BEZA", 10, 20_000),
                environmental_clearance(),
                power_connection(),
            ],
            price_bdt: 95_000,
        },
    ]
}

pub(crate) fn purchases() -> Vec<BundlePurchase> {
    vec![
        BundlePurchase {
            id: "PUR-0001".to_string(),
            bundle_id: "BUNDLE-001".to_string(),
            bbid: "BBID-1001".to_string(),
            purchased_on: day(2024, 1, 3),
            amount_bdt: 13_500,
            paid_on: Some(day(2024, 1, 3)),
            services_completed: ["SRV-001", "SRV-002", "SRV-003", "SRV-004"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            state: PurchaseState::Completed {
                completed_on: day(2024, 1, 19),
            },
        },
        BundlePurchase {
            id: "PUR-0002".to_string(),
            bundle_id: "BUNDLE-002".to_string(),
            bbid: "BBID-1016".to_string(),
            purchased_on: day(2024, 5, 21),
            amount_bdt: 100_000,
            paid_on: Some(day(2024, 5, 22)),
            services_completed: vec!["SRV-005".to_string()],
            state: PurchaseState::InProgress {
                current_service: "SRV-006".to_string(),
            },
        },
        BundlePurchase {
            id: "PUR-0003".to_string(),
            bundle_id: "BUNDLE-001".to_string(),
            bbid: "BBID-1018".to_string(),
            purchased_on: day(2024, 6, 5),
            amount_bdt: 13_500,
            paid_on: None,
            services_completed: Vec::new(),
            state: PurchaseState::PendingPayment,
        },
    ]
}
