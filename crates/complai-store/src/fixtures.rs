//! Demo records the store starts with before the first fetch.

use chrono::{TimeZone, Utc};
use complai_core::{Client, ClientId, ClientStatus, ClientType};

fn client(
    id: &str,
    name: &str,
    client_type: ClientType,
    pan: &str,
    gst: Option<&str>,
    created: (i32, u32, u32),
) -> Client {
    let (y, m, d) = created;
    Client {
        id: ClientId::new(id),
        name: name.to_string(),
        client_type,
        pan: Some(pan.to_string()),
        cin: None,
        gst: gst.map(str::to_string),
        tan: None,
        status: ClientStatus::Active,
        created_at: Utc
            .with_ymd_and_hms(y, m, d, 0, 0, 0)
            .single()
            .unwrap_or_default(),
        logo: None,
    }
}

/// The demo client list shown before the backend answers.
pub fn demo_clients() -> Vec<Client> {
    let mut acme = client(
        "1",
        "Acme Technologies Pvt Ltd",
        ClientType::PvtLtd,
        "AABCT1332L",
        Some("29AABCT1332L1ZA"),
        (2024, 1, 15),
    );
    acme.cin = Some("U72900KA2019PTC123456".to_string());
    acme.tan = Some("BLRA12345B".to_string());

    let green = client(
        "2",
        "Greenleaf Advisors LLP",
        ClientType::Llp,
        "AAPFU0939F",
        Some("27AAPFU0939F1ZV"),
        (2024, 3, 2),
    );

    let mut sharma = client(
        "3",
        "Sharma & Sons",
        ClientType::Partnership,
        "AAAFS1234K",
        None,
        (2023, 11, 20),
    );
    sharma.status = ClientStatus::Inactive;

    vec![acme, green, sharma]
}
