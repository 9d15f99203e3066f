//! Demo data set: the same shipments, clients and notifications the hosted
//! demo environment starts with.

use chrono::{DateTime, Duration, Utc};

use logipilot_model::{
    Alert, AlertCategory, AlertId, AlertSeverity, Client, ClientId, ClientStatus, Shipment,
    ShipmentId, ShipmentStatus,
};

use super::store::MockStore;

struct ShipmentSeed {
    id: &'static str,
    client: &'static str,
    status: ShipmentStatus,
    origin: &'static str,
    destination: &'static str,
    carrier: &'static str,
    tracking_number: Option<&'static str>,
    weight_kg: Option<f64>,
    contents: Option<&'static str>,
    notes: Option<&'static str>,
    eta_days: Option<i64>,
    age_days: i64,
}

const SHIPMENTS: [ShipmentSeed; 8] = [
    ShipmentSeed {
        id: "SH001",
        client: "TechCorp Inc.",
        status: ShipmentStatus::InTransit,
        origin: "Chicago",
        destination: "New York",
        carrier: "LogiFast",
        tracking_number: Some("LF123456789"),
        weight_kg: Some(25.0),
        contents: Some("Electronics"),
        notes: None,
        eta_days: Some(0),
        age_days: 3,
    },
    ShipmentSeed {
        id: "SH002",
        client: "Global Logistics",
        status: ShipmentStatus::Delivered,
        origin: "New York",
        destination: "Los Angeles",
        carrier: "SpeedyShip",
        tracking_number: Some("SS987654321"),
        weight_kg: Some(150.0),
        contents: Some("Industrial Parts"),
        notes: None,
        eta_days: None,
        age_days: 10,
    },
    ShipmentSeed {
        id: "SH003",
        client: "MegaStore LLC",
        status: ShipmentStatus::Processing,
        origin: "Los Angeles",
        destination: "Chicago",
        carrier: "LogiFast",
        tracking_number: None,
        weight_kg: Some(500.0),
        contents: Some("Retail Goods"),
        notes: None,
        eta_days: Some(1),
        age_days: 1,
    },
    ShipmentSeed {
        id: "SH004",
        client: "FastTrack Co.",
        status: ShipmentStatus::Delayed,
        origin: "Dallas",
        destination: "Miami",
        carrier: "SpeedyShip",
        tracking_number: Some("SS123123123"),
        weight_kg: Some(75.0),
        contents: Some("Perishables"),
        notes: Some("Weather delay in Atlanta"),
        eta_days: Some(0),
        age_days: 5,
    },
    ShipmentSeed {
        id: "SH005",
        client: "Innovate Solutions",
        status: ShipmentStatus::InTransit,
        origin: "Warehouse A",
        destination: "Dallas",
        carrier: "Local Carrier",
        tracking_number: None,
        weight_kg: None,
        contents: None,
        notes: None,
        eta_days: Some(0),
        age_days: 0,
    },
    ShipmentSeed {
        id: "SH006",
        client: "Alpha Goods",
        status: ShipmentStatus::Delivered,
        origin: "Factory B",
        destination: "Seattle",
        carrier: "National Freight",
        tracking_number: None,
        weight_kg: None,
        contents: None,
        notes: None,
        eta_days: None,
        age_days: 0,
    },
    ShipmentSeed {
        id: "SH007",
        client: "NextGen Retail",
        status: ShipmentStatus::Processing,
        origin: "Port C",
        destination: "Austin",
        carrier: "SeaLink Logistics",
        tracking_number: None,
        weight_kg: None,
        contents: None,
        notes: None,
        eta_days: Some(2),
        age_days: 0,
    },
    ShipmentSeed {
        id: "SH008",
        client: "Quick Supplies",
        status: ShipmentStatus::Delayed,
        origin: "Distribution Hub D",
        destination: "Denver",
        carrier: "Air Express",
        tracking_number: None,
        weight_kg: None,
        contents: None,
        notes: None,
        eta_days: Some(0),
        age_days: 0,
    },
];

/// Fill `store` with the demo records.
pub(super) fn populate(store: &MockStore) {
    let now = Utc::now();

    for seed in SHIPMENTS {
        store.push_shipment(shipment(&seed, now));
    }
    for client in clients(now) {
        store.push_client(client);
    }
    for alert in alerts(now) {
        store.push_alert(alert);
    }
}

fn shipment(seed: &ShipmentSeed, now: DateTime<Utc>) -> Shipment {
    let created_at = now - Duration::days(seed.age_days);
    Shipment {
        id: ShipmentId::new(seed.id),
        client: seed.client.to_string(),
        status: seed.status,
        origin: seed.origin.to_string(),
        destination: seed.destination.to_string(),
        carrier: seed.carrier.to_string(),
        tracking_number: seed.tracking_number.map(str::to_string),
        weight_kg: seed.weight_kg,
        dimensions_cm: None,
        contents: seed.contents.map(str::to_string),
        notes: seed.notes.map(str::to_string),
        eta: seed
            .eta_days
            .map(|days| now.date_naive() + Duration::days(days)),
        created_at,
        updated_at: now,
    }
}

fn clients(now: DateTime<Utc>) -> Vec<Client> {
    vec![
        Client {
            id: ClientId::new("CL001"),
            name: "TechCorp Inc.".to_string(),
            email: "contact@techcorp.com".to_string(),
            phone: Some("555-0101".to_string()),
            address: Some("123 Tech Road, Silicon Valley, CA".to_string()),
            status: ClientStatus::Active,
            company_name: Some("TechCorp Incorporated".to_string()),
            contact_person: Some("Jane Doe".to_string()),
            industry: Some("Technology".to_string()),
            notes: None,
            satisfaction_score: Some(92.0),
            created_at: now - Duration::days(100),
            updated_at: now,
        },
        Client {
            id: ClientId::new("CL002"),
            name: "Global Logistics".to_string(),
            email: "info@globallogistics.com".to_string(),
            phone: Some("555-0202".to_string()),
            address: Some("456 Trade St, New York, NY".to_string()),
            status: ClientStatus::Active,
            company_name: Some("Global Logistics Solutions".to_string()),
            contact_person: Some("John Smith".to_string()),
            industry: Some("Logistics".to_string()),
            notes: None,
            satisfaction_score: Some(88.0),
            created_at: now - Duration::days(200),
            updated_at: now,
        },
        Client {
            id: ClientId::new("CL003"),
            name: "MegaStore LLC".to_string(),
            email: "support@megastore.com".to_string(),
            phone: Some("555-0303".to_string()),
            address: None,
            status: ClientStatus::Inactive,
            company_name: Some("MegaStore Retail".to_string()),
            contact_person: None,
            industry: Some("Retail".to_string()),
            notes: None,
            satisfaction_score: None,
            created_at: now - Duration::days(50),
            updated_at: now - Duration::days(10),
        },
        Client {
            id: ClientId::new("CL004"),
            name: "Innovate Solutions".to_string(),
            email: "leads@innovate.io".to_string(),
            phone: None,
            address: None,
            status: ClientStatus::Prospect,
            company_name: None,
            contact_person: None,
            industry: Some("Consulting".to_string()),
            notes: None,
            satisfaction_score: None,
            created_at: now - Duration::days(5),
            updated_at: now,
        },
        Client {
            id: ClientId::new("CL005"),
            name: "Alpha Goods".to_string(),
            email: "onboarding@alphagoods.co".to_string(),
            phone: None,
            address: None,
            status: ClientStatus::Onboarding,
            company_name: Some("Alpha Goods Ltd.".to_string()),
            contact_person: Some("Alice Brown".to_string()),
            industry: Some("Manufacturing".to_string()),
            notes: None,
            satisfaction_score: None,
            created_at: now - Duration::days(2),
            updated_at: now,
        },
    ]
}

fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert {
            id: AlertId::new("notif001"),
            title: "Shipment SH001 Delayed".to_string(),
            description: "ETA updated due to weather conditions.".to_string(),
            severity: AlertSeverity::High,
            category: AlertCategory::Shipment,
            timestamp: now - Duration::minutes(1),
            read: false,
            link: Some("/shipments?id=SH001".to_string()),
        },
        Alert {
            id: AlertId::new("notif002"),
            title: "New Client Onboarded: Alpha Corp".to_string(),
            description: "Alpha Corp has been successfully onboarded.".to_string(),
            severity: AlertSeverity::Success,
            category: AlertCategory::Client,
            timestamp: now - Duration::minutes(5),
            read: true,
            link: Some("/clients?id=CL_ALPHA".to_string()),
        },
        Alert {
            id: AlertId::new("notif003"),
            title: "System Maintenance Scheduled".to_string(),
            description: "System will be down for maintenance tonight at 2 AM.".to_string(),
            severity: AlertSeverity::Info,
            category: AlertCategory::System,
            timestamp: now - Duration::minutes(30),
            read: false,
            link: None,
        },
        Alert {
            id: AlertId::new("notif004"),
            title: "Report Submitted: REP004".to_string(),
            description: "A new incident report has been submitted by John Doe.".to_string(),
            severity: AlertSeverity::Info,
            category: AlertCategory::Report,
            timestamp: now - Duration::minutes(60),
            read: true,
            link: Some("/reports?id=REP004".to_string()),
        },
    ]
}
