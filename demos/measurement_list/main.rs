//! Measurement list walkthrough
//!
//! This example demonstrates:
//! - Loading configuration (optionally from a YAML file given as first argument)
//! - Seeding an in-memory record service
//! - Filtering, sorting and paging a list through `TableState`
//! - Role-aware capabilities, the home-page overview and a share link

use desk::prelude::*;
use tracing_subscriber::EnvFilter;

fn seed() -> Vec<Measurement> {
    let rows = [
        ("Raj Kumar", "9123456789", "12 MG Road", Some("2024-01-05"), MeasurementStatus::Assigned),
        ("Alice Fernandes", "9000000001", "4 Church Street", None, MeasurementStatus::Created),
        ("Bob Mathew", "9000000002", "77 Lake View", Some("2024-01-10"), MeasurementStatus::InProgress),
        ("Carl Dsouza", "9000000003", "1 Hill Road", Some("2024-02-01"), MeasurementStatus::Approved),
        ("Deepa Raj", "9000000004", "9 Park Lane", Some("2024-01-07"), MeasurementStatus::Assigned),
        ("Esha Nair", "9000000005", "", Some("2024-01-20"), MeasurementStatus::Created),
    ];

    rows.into_iter()
        .map(|(name, mobile, address, date, status)| {
            let mut m = Measurement::new(name, mobile, address);
            m.measurement_date = date.map(str::to_string);
            m.status = Some(status);
            m
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("📏 Desk measurement list example");
    println!("================================\n");

    let config = match std::env::args().nth(1) {
        Some(path) => DeskConfig::from_yaml_file(path)?,
        None => DeskConfig::default_config(),
    };
    println!("✅ API base URL: {}", config.api.base_url);
    println!("✅ Page sizes: {:?}\n", config.table.page_size_options);

    // Services
    let measurements = InMemoryRecordService::<Measurement>::with_entities(seed())?;
    let users = InMemoryRecordService::<User>::with_entities([
        User::new("Asha", "Rao", "98765-43210").with_role(Role::Normal),
        User::new("Admin", "Desk", "9999999999").with_role(Role::Admin),
    ])?;

    // Log in
    let session = StaticAuthenticator::default()
        .login(&LoginForm::new("admin@demo.com", "admin123"))
        .await?;
    let email = session.user.as_ref().map(|u| u.email.as_str()).unwrap_or("-");
    println!("🔑 Logged in as {} ({})\n", email, session.role());

    // List query
    let engine = QueryEngine::new(config.schema("measurement")?.clone());
    let all = measurements.list().await?;
    let records = to_records(&all)?;

    let mut table = TableState::for_engine(&engine, &config.table);
    table.set_text("raj");
    table.request_sort("measurement_date");
    table.request_sort("measurement_date");

    let view = table.view(&engine, &records);
    println!(
        "🔎 '{}' sorted by {} {}: {} of {} rows",
        table.criteria().text,
        table.criteria().sort_field,
        table.criteria().sort_direction,
        view.filtered_len,
        records.len()
    );
    for row in &view.rows {
        println!(
            "   - {:<18} {}",
            row.get_str("customer_name").unwrap_or("-"),
            row.get_str("measurement_date").unwrap_or("no date")
        );
    }

    table.set_text("");
    table.set_date_range(
        NaiveDate::from_ymd_opt(2024, 1, 1),
        NaiveDate::from_ymd_opt(2024, 1, 31),
    );
    table.set_page(1);
    let view = table.view(&engine, &records);
    println!(
        "\n📅 January, page {}/{}: {} rows, {} placeholder rows",
        view.pagination.page + 1,
        view.pagination.total_pages,
        view.rows.len(),
        view.empty_rows
    );

    // Capabilities
    let normal = Capabilities::for_role(Role::Normal);
    for m in all.iter().take(3) {
        let actions: Vec<&str> = normal
            .allowed_actions(Some(m.status()))
            .iter()
            .map(|a| a.as_str())
            .collect();
        println!("🛂 normal user on {} ({}): {:?}", m.customer_name, m.status(), actions);
    }

    // Overview
    let directory = users.list().await?;
    let overview = Overview::compute(session.role(), &all, &directory);
    println!(
        "\n📊 {} users, {} measurements, {} assigned, {} in progress",
        overview.total_users, overview.total_measurements, overview.assigned, overview.in_progress
    );

    // Share
    let assignee = assignable_users(&directory)
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no assignable user"))?;
    if let Some(link) = WhatsAppLink::build_with(&config.share, &assignee, &all[0], Platform::Desktop)? {
        println!("\n📨 Share with {}: {}", assignee.full_name(), link.url);
    }

    Ok(())
}
