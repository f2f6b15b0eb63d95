use std::{str::FromStr, sync::Arc};

use chrono::{Duration, Utc};
use clap::Parser;
use fake::{
    faker::{
        address::en::CityName,
        lorem::en::{Paragraph, Sentence},
        name::en::{FirstName, LastName},
    },
    Fake,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use volunteer_portal::{
    auth::AuthService,
    config::{BootstrapAdminConfig, DEFAULT_JWT_SECRET},
    domain::{EventInput, EventStatus, NewAnnouncement, Visibility},
    error::AppError,
    notifications::LogNotificationSink,
    service::{user_service::Signup, ServiceContext},
};

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Populate the database with sample volunteers, events and announcements")]
struct Args {
    /// SQLite connection string
    #[arg(long, default_value = "sqlite://volunteer_portal.db?mode=rwc")]
    database_url: String,

    /// Number of volunteer accounts to create
    #[arg(long, default_value_t = 10)]
    volunteers: usize,

    /// Number of events to create
    #[arg(long, default_value_t = 5)]
    events: usize,

    #[arg(long, default_value = "admin@volunteer-portal.local")]
    admin_email: String,

    #[arg(long, default_value = "admin12345")]
    admin_password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    println!("🌱 Starting database seeding...");

    let connect_options = SqliteConnectOptions::from_str(&args.database_url)?
        .foreign_keys(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let context = ServiceContext::new(
        db_pool.clone(),
        Arc::new(AuthService::new(DEFAULT_JWT_SECRET, 24)),
        Arc::new(LogNotificationSink),
    );

    println!("👥 Creating users...");
    let created_admin = context.user_service
        .ensure_admin(&BootstrapAdminConfig {
            email: args.admin_email.clone(),
            password: args.admin_password.clone(),
            first_name: "Portal".to_string(),
            last_name: "Admin".to_string(),
        })
        .await?;
    if created_admin.is_some() {
        println!("  ✅ Created admin user ({} / {})", args.admin_email, args.admin_password);
    } else {
        println!("  ↪ Admin {} already exists", args.admin_email);
    }

    let mut volunteers = Vec::with_capacity(args.volunteers);
    for i in 0..args.volunteers {
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let email = format!("volunteer{}@example.com", i + 1);

        let signup = Signup {
            first_name,
            last_name,
            email: email.clone(),
            password: "password123".to_string(),
            phone: Some(format!("555-01{:02}", i % 100)),
        };

        match context.user_service.register(signup).await {
            Ok(user) => volunteers.push(user),
            Err(AppError::DuplicateEmail) => {
                if let Some(existing) = context.user_repo.find_by_email(&email).await? {
                    volunteers.push(existing);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!("  ✅ {} volunteers ready (password: password123)", volunteers.len());

    println!("📅 Creating events...");
    let mut events = Vec::with_capacity(args.events);
    for i in 0..args.events {
        let start = Utc::now() + Duration::days(7 * (i as i64 + 1));
        let city: String = CityName().fake();
        let title: String = Sentence(2..5).fake();

        let event = context.event_repo
            .create(EventInput {
                title: title.trim_end_matches('.').to_string(),
                description: Some(Paragraph(1..3).fake()),
                location: Some(format!("{} Community Center", city)),
                start_date: start,
                end_date: start + Duration::hours(4),
                status: EventStatus::Upcoming,
            })
            .await?;
        events.push(event);
    }
    println!("  ✅ Created {} events", events.len());

    if !events.is_empty() {
        println!("📝 Creating registrations...");
        let mut submitted = 0;
        for (i, volunteer) in volunteers.iter().enumerate() {
            let event = &events[i % events.len()];
            let registration = match context.registration_service.submit(volunteer.id, event.id).await {
                Ok(registration) => registration,
                Err(AppError::DuplicateRegistration) => continue,
                Err(e) => return Err(e.into()),
            };
            submitted += 1;

            // Leave every third one pending for the admin to review
            match i % 3 {
                0 => { context.registration_service.decide(registration.id, "approved").await?; }
                1 => { context.registration_service.decide(registration.id, "rejected").await?; }
                _ => {}
            }
        }
        println!("  ✅ Submitted {} registrations", submitted);

        println!("📢 Creating announcements...");
        let visibilities = [Visibility::Public, Visibility::Registered, Visibility::Private];
        for (i, event) in events.iter().enumerate() {
            let title: String = Sentence(3..6).fake();
            context.announcement_service
                .create(NewAnnouncement {
                    event_id: event.id,
                    title: title.trim_end_matches('.').to_string(),
                    content: Paragraph(2..4).fake(),
                    visibility: visibilities[i % visibilities.len()],
                })
                .await?;
        }
        println!("  ✅ Created {} announcements", events.len());
    }

    println!("🎉 Seeding complete");
    Ok(())
}
