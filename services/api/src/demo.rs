use crate::infra::{load_store, parse_date, resolve_today};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use oss_portal::config::AppConfig;
use oss_portal::error::AppError;
use oss_portal::portal::applications::{self, SectorSummary};
use oss_portal::portal::bundles::{self, BundleProgress};
use oss_portal::portal::devices;
use oss_portal::portal::documents;
use oss_portal::portal::ledger::{self, RecordKind};
use oss_portal::portal::notifications::{self, SeededCounts};
use oss_portal::portal::officers;
use oss_portal::portal::overview::{self, PortalOverview};
use oss_portal::portal::sla;
use oss_portal::portal::talent::{self, TalentMetric};
use oss_portal::portal::FixtureStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Panel {
    Overview,
    Applications,
    Officers,
    Sla,
    Marketplace,
    Talent,
    Ledger,
    Documents,
    Devices,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MetricArg {
    Workforce,
    Graduates,
    TechnicalSkilled,
}

impl From<MetricArg> for TalentMetric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Workforce => TalentMetric::Workforce,
            MetricArg::Graduates => TalentMetric::Graduates,
            MetricArg::TechnicalSkilled => TalentMetric::TechnicalSkilled,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Dashboard panel to print
    #[arg(value_enum)]
    pub(crate) panel: Panel,
    /// Reporting date (YYYY-MM-DD). Defaults to APP_REFERENCE_DATE, then today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Investor BBID for the documents panel
    #[arg(long, default_value = "BBID-1001")]
    pub(crate) bbid: String,
    /// Row limit for ranked listings
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: usize,
    /// Ranking metric for the talent panel
    #[arg(long, value_enum, default_value_t = MetricArg::TechnicalSkilled)]
    pub(crate) metric: MetricArg,
    /// Print the panel as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Reporting date (YYYY-MM-DD). Defaults to APP_REFERENCE_DATE, then today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Bundle to purchase during the walkthrough
    #[arg(long, default_value = "BUNDLE-001")]
    pub(crate) bundle: String,
    /// Investor BBID making the purchase
    #[arg(long, default_value = "BBID-2001")]
    pub(crate) bbid: String,
    /// Seed for the simulated notification counter (defaults to APP_NOTIFICATION_SEED)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("JSON rendering unavailable: {err}"),
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = load_store(&config.portal)?;
    let today = resolve_today(args.today, config.portal.reference_date);

    match args.panel {
        Panel::Overview => {
            let view = overview::portal_overview(&store, today);
            if args.json {
                print_json(&view);
            } else {
                render_overview(&view);
            }
        }
        Panel::Applications => render_applications(&store, args.json),
        Panel::Officers => render_officers(&store, today, args.limit, args.json),
        Panel::Sla => render_sla(&store, args.json),
        Panel::Marketplace => render_marketplace(&store, args.json),
        Panel::Talent => render_talent(&store, args.metric.into(), args.limit, args.json),
        Panel::Ledger => render_ledger(&store, args.json),
        Panel::Documents => render_documents(&store, &args.bbid, today, args.json),
        Panel::Devices => render_devices(&store, today, args.json),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        bundle,
        bbid,
        seed,
    } = args;

    let config = AppConfig::load()?;
    let today = resolve_today(today, config.portal.reference_date);
    let mut store = load_store(&config.portal)?;

    println!("One-Stop-Service portal demo ({today})");
    render_overview(&overview::portal_overview(&store, today));

    println!("\nBundle marketplace walkthrough");
    let purchase = bundles::purchase_bundle(&mut store, &bundle, &bbid, today)?;
    println!(
        "- {} purchased {} as {} for BDT {}",
        bbid, bundle, purchase.id, purchase.amount_bdt
    );
    bundles::process_bundle_payment(&mut store, &purchase.id, today)?;
    print_progress(bundles::bundle_progress(&store, &purchase.id));

    let services: Vec<String> = bundles::bundle_by_id(&store.bundles, &bundle)
        .map(|found| found.services.iter().map(|service| service.id.clone()).collect())
        .unwrap_or_default();
    for service_id in services {
        let updated = bundles::complete_service(&mut store, &purchase.id, &service_id, today)?;
        println!("- Completed {service_id} -> {}", updated.status().label());
    }
    print_progress(bundles::bundle_progress(&store, &purchase.id));

    match bundles::cancel_purchase(&mut store, &purchase.id, today, None) {
        Ok(_) => println!("- Unexpected: completed purchase accepted a cancellation"),
        Err(err) => println!("- Cancellation correctly refused: {err}"),
    }

    let record = ledger::append_record(
        &mut store,
        RecordKind::Certificate,
        &format!("CERT-{}", purchase.id),
        &bbid,
        today,
    );
    let verification = ledger::verify_chain(&store.ledger);
    println!(
        "\nLedger: appended {} ({}...) | chain valid: {} across {} records",
        record.id,
        record.hash.get(..12).unwrap_or(record.hash.as_str()),
        verification.valid,
        verification.checked
    );

    let mut counts = SeededCounts::new(seed.unwrap_or(config.portal.notification_seed));
    let snapshot =
        notifications::notification_snapshot(&store.notifications, "BBID-1001", &mut counts);
    println!(
        "Notifications for {}: {} unread of {} | {} new since last visit (simulated)",
        snapshot.bbid, snapshot.unread, snapshot.total, snapshot.simulated_new
    );

    println!("\nMarketplace after the walkthrough");
    render_marketplace(&store, false);

    Ok(())
}

fn print_progress(progress: Option<BundleProgress>) {
    match progress {
        Some(progress) => println!(
            "- {} is {} ({}% complete, current service: {})",
            progress.purchase_id,
            progress.status.label(),
            progress.percent_complete,
            progress.current_service.as_deref().unwrap_or("none")
        ),
        None => println!("- Purchase progress unavailable"),
    }
}

pub(crate) fn render_overview(view: &PortalOverview) {
    println!("Portal overview as of {}", view.as_of);
    println!("- Health: {}", view.health.label());
    println!(
        "- Applications: {} total | {} approved | {}% approval rate",
        view.applications.total, view.applications.approved, view.approval_rate
    );
    println!("- Investment pipeline: USD {}", view.total_investment_usd);
    println!(
        "- SLA compliance: {}% | {} bottleneck(s)",
        view.portal_sla_compliance,
        view.bottlenecks.len()
    );
    if let Some(sector) = &view.top_sector {
        println!(
            "- Leading sector: {} (USD {} across {} applications)",
            sector.sector_label, sector.investment_usd, sector.applications
        );
    }
    println!(
        "- Marketplace revenue: BDT {} | {} purchase(s) awaiting payment",
        view.marketplace_revenue_bdt, view.awaiting_payment
    );
    println!(
        "- Ledger trust level: {}% (chain {})",
        view.ledger_trust_level,
        if view.ledger_valid { "intact" } else { "broken" }
    );

    println!("Observations:");
    for observation in &view.observations {
        println!("  - {observation}");
    }
    println!("Recommended actions:");
    for action in &view.recommended_actions {
        println!("  - {action}");
    }
}

fn render_applications(store: &FixtureStore, json: bool) {
    let breakdown = applications::status_breakdown(&store.applications);
    let sectors = applications::sector_breakdown(&store.applications);
    if json {
        print_json(&serde_json::json!({ "breakdown": breakdown, "sectors": sectors }));
        return;
    }

    println!(
        "Applications: {} total | {} approved | {} rejected | {} in progress | {} under review",
        breakdown.total,
        breakdown.approved,
        breakdown.rejected,
        breakdown.in_progress,
        breakdown.under_review
    );
    println!("Approval rate: {}%", breakdown.approval_rate());
    println!("By sector:");
    for SectorSummary {
        sector_label,
        applications,
        investment_usd,
        approval_rate,
        ..
    } in &sectors
    {
        println!(
            "  - {sector_label}: {applications} application(s) | USD {investment_usd} | {approval_rate}% approved"
        );
    }
}

fn render_officers(store: &FixtureStore, today: NaiveDate, limit: usize, json: bool) {
    let stats = officers::officer_stats(&store.officers, &store.applications, today);
    let leaderboard = officers::leaderboard(&stats, limit);
    let team = officers::team_averages(&stats);
    if json {
        print_json(&serde_json::json!({ "leaderboard": leaderboard, "team_averages": team }));
        return;
    }

    println!("Officer leaderboard");
    for (rank, entry) in leaderboard.iter().enumerate() {
        println!(
            "  {}. {} | {} handled | {}% approved | {:.1} avg days",
            rank + 1,
            entry.name,
            entry.total,
            entry.approval_rate,
            entry.avg_days
        );
    }
    println!(
        "Team averages: {:.1}% approval | {:.1} days",
        team.approval_rate, team.avg_days
    );
}

fn render_sla(store: &FixtureStore, json: bool) {
    let stats = sla::agency_stats(&store.agencies, &store.applications);
    let bottlenecks = sla::bottlenecks(&store.agencies);
    if json {
        print_json(&serde_json::json!({ "agencies": stats, "bottlenecks": bottlenecks }));
        return;
    }

    println!("Agency SLA tracker (portal compliance {}%)", sla::portal_compliance(&stats));
    for entry in &stats {
        println!(
            "  - {}: target {:.0}d | avg {:.1}d | {}% compliant | {} pending",
            entry.code,
            entry.sla_target_days,
            entry.avg_response_days,
            entry.sla_compliance,
            entry.current_load
        );
    }
    if bottlenecks.is_empty() {
        println!("No agency is running over its SLA target");
    } else {
        println!("Bottlenecks:");
        for bottleneck in &bottlenecks {
            println!("  - {} (+{:.1} days)", bottleneck.name, bottleneck.delay_days);
        }
    }
}

fn render_marketplace(store: &FixtureStore, json: bool) {
    let stats = bundles::marketplace_stats(store);
    if json {
        print_json(&stats);
        return;
    }

    println!("Bundles:");
    for bundle in &store.bundles {
        let savings = bundles::bundle_savings(bundle);
        println!(
            "  - {} {}: BDT {} (saves BDT {}, {}%) | ~{} days",
            bundle.id,
            bundle.name,
            bundle.price_bdt,
            savings.savings_bdt,
            savings.savings_pct,
            bundle.estimated_days()
        );
    }
    println!(
        "Purchases: {} total | {} active | {} completed | {} cancelled | revenue BDT {}",
        stats.purchases, stats.active, stats.completed, stats.cancelled, stats.revenue_bdt
    );
    for entry in &stats.popular {
        println!("  - {}: {} purchase(s)", entry.name, entry.purchases);
    }
}

fn render_talent(store: &FixtureStore, metric: TalentMetric, limit: usize, json: bool) {
    let divisions = talent::division_summary(&store.districts);
    let top = talent::top_districts(&store.districts, metric, limit);
    if json {
        print_json(&serde_json::json!({ "divisions": divisions, "top_districts": top }));
        return;
    }

    println!("Talent by division");
    for division in &divisions {
        println!(
            "  - {}: {} district(s) | workforce {} | {}% technically skilled",
            division.division, division.districts, division.workforce, division.technical_share
        );
    }
    println!("Top districts:");
    for district in top {
        println!(
            "  - {} ({}): {} skilled | heat {} | {}",
            district.district,
            district.division,
            district.technical_skilled,
            district.heat_level().label(),
            district.key_skills.join(", ")
        );
    }
}

fn render_ledger(store: &FixtureStore, json: bool) {
    let verification = ledger::verify_chain(&store.ledger);
    let trust = ledger::trust_level(&store.ledger);
    if json {
        print_json(&serde_json::json!({
            "verification": verification,
            "trust_level": trust,
            "records": store.ledger,
        }));
        return;
    }

    println!(
        "Ledger: {} record(s) | chain {} | trust level {}%",
        verification.checked,
        if verification.valid { "valid" } else { "broken" },
        trust
    );
    for record in &store.ledger {
        println!(
            "  - {} {} {} ({}) {}",
            record.id,
            record.kind.label(),
            record.reference,
            record.recorded_on,
            if record.verified { "verified" } else { "unverified" }
        );
    }
}

fn render_documents(store: &FixtureStore, bbid: &str, today: NaiveDate, json: bool) {
    let owned = documents::documents_for_bbid(&store.documents, bbid);
    let summary = documents::vault_summary(owned.iter().copied());
    let expiring = documents::expiring_within(&store.documents, today, 30);
    if json {
        print_json(&serde_json::json!({
            "summary": summary,
            "documents": owned,
            "expiring": expiring,
        }));
        return;
    }

    println!(
        "Document vault for {bbid}: {} total | {} verified | {} pending | {} rejected | {}% complete",
        summary.total, summary.verified, summary.pending, summary.rejected, summary.completeness
    );
    for document in &owned {
        println!("  - {} {} ({:?})", document.id, document.name, document.status);
    }
    if !expiring.is_empty() {
        println!("Expiring within 30 days:");
        for document in expiring {
            if let Some(expires_on) = document.expires_on {
                println!("  - {} {} on {}", document.id, document.name, expires_on);
            }
        }
    }
}

fn render_devices(store: &FixtureStore, today: NaiveDate, json: bool) {
    let summary = devices::fleet_summary(&store.devices, today);
    if json {
        print_json(&serde_json::json!({ "summary": summary, "devices": store.devices }));
        return;
    }

    println!(
        "Biometric fleet: {}/{} online ({}%) | {} enrolled users | {} stale",
        summary.online, summary.total, summary.online_rate, summary.enrolled_users, summary.stale
    );
    for device in &store.devices {
        println!(
            "  - {} {} [{:?}] last sync {}{}",
            device.id,
            device.location,
            device.modality,
            device.last_sync,
            if device.is_stale(today) { " (stale)" } else { "" }
        );
    }
}
