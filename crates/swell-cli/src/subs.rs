//! `swell subs …`: scripted subscription management against the API.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use swell_core::{
  forecast::{ForecastKind, LookoutWindow},
  subscription::{DeliveryDay, DeliveryTime, Frequency, NewSubscription, Subscription},
};
use tracing::info;
use uuid::Uuid;

use crate::client::ApiClient;

#[derive(Subcommand, Debug)]
pub enum SubsCommand {
  /// List every subscription.
  List,
  /// Create a subscription.
  Add(SubscriptionArgs),
  /// Change fields of an existing subscription.
  Edit {
    id:   Uuid,
    #[command(flatten)]
    args: SubscriptionArgs,
  },
  /// Delete a subscription.
  Rm { id: Uuid },
  /// Send a subscription's forecasts right now.
  Deliver { id: Uuid },
}

/// Subscription fields; anything left out keeps its default (or current)
/// value.
#[derive(Args, Debug, Default)]
pub struct SubscriptionArgs {
  /// Forecast location; repeat for several.
  #[arg(short, long = "location", value_name = "LOCATION")]
  pub locations: Vec<String>,
  /// `surf` or `kitesurf`.
  #[arg(long)]
  pub kind:      Option<ForecastKind>,
  /// `next_3_days` or `next_week`.
  #[arg(long)]
  pub window:    Option<LookoutWindow>,
  /// `daily` or `weekly`.
  #[arg(long)]
  pub frequency: Option<Frequency>,
  /// Weekday for weekly deliveries.
  #[arg(long)]
  pub day:       Option<DeliveryDay>,
  /// Delivery time as `HH:MM`.
  #[arg(long)]
  pub time:      Option<DeliveryTime>,
  #[arg(long)]
  pub email:     Option<String>,
}

impl SubscriptionArgs {
  /// Build a fresh subscription. Locations and email are required.
  pub fn into_new(self) -> Result<NewSubscription> {
    if self.locations.is_empty() {
      bail!("at least one --location is required");
    }
    let Some(email) = self.email else {
      bail!("--email is required");
    };
    Ok(NewSubscription {
      locations:     self.locations,
      kind:          self.kind.unwrap_or_default(),
      frequency:     self.frequency.unwrap_or_default(),
      window:        self.window.unwrap_or_default(),
      delivery_day:  self.day.unwrap_or_default(),
      delivery_time: self.time.unwrap_or_default(),
      email,
    })
  }

  /// Overlay the given fields onto an existing subscription.
  pub fn apply_to(self, mut details: NewSubscription) -> NewSubscription {
    if !self.locations.is_empty() {
      details.locations = self.locations;
    }
    if let Some(kind) = self.kind {
      details.kind = kind;
    }
    if let Some(window) = self.window {
      details.window = window;
    }
    if let Some(frequency) = self.frequency {
      details.frequency = frequency;
    }
    if let Some(day) = self.day {
      details.delivery_day = day;
    }
    if let Some(time) = self.time {
      details.delivery_time = time;
    }
    if let Some(email) = self.email {
      details.email = email;
    }
    details
  }
}

pub async fn run(client: &ApiClient, command: SubsCommand) -> Result<()> {
  match command {
    SubsCommand::List => {
      let subs = client.list_subscriptions().await?;
      if subs.is_empty() {
        println!("no subscriptions");
      }
      for sub in &subs {
        println!("{}", summary(sub));
      }
    }
    SubsCommand::Add(args) => {
      let sub = client.create_subscription(&args.into_new()?).await?;
      info!(id = %sub.subscription_id, "subscription created");
      println!("{}", summary(&sub));
    }
    SubsCommand::Edit { id, args } => {
      let current = client.get_subscription(id).await?;
      let details = args.apply_to(current.details);
      let sub = client.update_subscription(id, &details).await?;
      info!(%id, "subscription updated");
      println!("{}", summary(&sub));
    }
    SubsCommand::Rm { id } => {
      client.delete_subscription(id).await?;
      println!("deleted {id}");
    }
    SubsCommand::Deliver { id } => {
      let outcomes = client.deliver(id).await?;
      for outcome in &outcomes {
        match &outcome.error {
          None => println!("{}: delivered", outcome.location),
          Some(e) => println!("{}: failed ({e})", outcome.location),
        }
      }
      if outcomes.iter().any(|o| !o.success) {
        bail!("some deliveries failed");
      }
    }
  }
  Ok(())
}

/// One line per subscription.
fn summary(sub: &Subscription) -> String {
  let d = &sub.details;
  let when = match d.frequency {
    Frequency::Daily => format!("daily at {}", d.delivery_time),
    Frequency::Weekly => format!("{} at {}", d.delivery_day, d.delivery_time),
  };
  format!(
    "{}  {}  {} {}  {}  → {}",
    sub.subscription_id,
    d.locations.join(", "),
    d.kind,
    d.window,
    when,
    d.email
  )
}
