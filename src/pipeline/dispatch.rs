//! Announcement dispatch.
//!
//! Filters the fetched conferences, drops the ones already announced, hands
//! the rest to a publisher and records what was delivered.
//!
//! Progress is saved even when a publish fails partway: every conference
//! delivered before the failure is in the state file, so a retry does not
//! send it again. A crash between a send and the final save can still
//! repeat a delivery.

use crate::error::{AppError, Result};
use crate::models::Conference;
use crate::pipeline::filter::{Predicate, apply};
use crate::publish::{BatchPublisher, Publisher};
use crate::storage::StateStore;

/// Filter settings for one dispatch.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// `YYYY-MM-DD`
    pub today: String,
    pub cfp_finished: bool,
    pub countries_blacklist: Vec<String>,
}

impl DispatchOptions {
    fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::is_in_future(&self.today),
            Predicate::cfp_finished(self.cfp_finished, &self.today),
            Predicate::country_not_blacklisted(self.countries_blacklist.iter().cloned()),
        ]
    }
}

/// Counts from one dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Conferences in the upstream list
    pub fetched: usize,
    /// Left after the date, CFP and country filters
    pub eligible: usize,
    /// Eligible but announced by an earlier run
    pub already_announced: usize,
    pub published: usize,
}

/// Apply the date, CFP and country filters.
pub fn select_eligible(fetched: Vec<Conference>, options: &DispatchOptions) -> Vec<Conference> {
    apply(fetched, &options.predicates())
}

/// Publish every new eligible conference, one at a time.
///
/// Stops at the first publish failure. The announced set, including the
/// conferences delivered before the failure, is saved before the error is
/// returned.
pub async fn run_dispatch(
    fetched: Vec<Conference>,
    options: &DispatchOptions,
    store: &dyn StateStore,
    publisher: &dyn Publisher,
) -> Result<DispatchReport> {
    let mut report = DispatchReport {
        fetched: fetched.len(),
        ..DispatchReport::default()
    };

    let eligible = select_eligible(fetched, options);
    report.eligible = eligible.len();

    let mut announced = store.load(&options.today).await;
    let pending = apply(eligible, &[Predicate::not_already_announced(&announced)]);
    report.already_announced = report.eligible - pending.len();

    log::info!(
        "{} of {} conferences eligible, {} new for {}",
        report.eligible,
        report.fetched,
        pending.len(),
        publisher.destination()
    );

    for conference in pending {
        if let Err(e) = publisher.publish(&conference).await {
            let e = match e {
                AppError::Publish { .. } => e,
                other => AppError::publish(publisher.destination(), &conference.name, other),
            };
            log::error!("{}", e);

            if let Err(save_err) = store.save(&announced).await {
                log::error!("Could not save announced conferences: {}", save_err);
            }
            return Err(e);
        }

        announced.push(conference);
        report.published += 1;
    }

    store.save(&announced).await?;
    Ok(report)
}

/// Publish the eligible conferences as one batch.
///
/// With a store, conferences already announced are left out and the batch
/// is recorded once it is delivered. Without one, every eligible conference
/// is published and nothing is recorded.
pub async fn run_batch_dispatch(
    fetched: Vec<Conference>,
    options: &DispatchOptions,
    store: Option<&dyn StateStore>,
    publisher: &dyn BatchPublisher,
) -> Result<DispatchReport> {
    let mut report = DispatchReport {
        fetched: fetched.len(),
        ..DispatchReport::default()
    };

    let eligible = select_eligible(fetched, options);
    report.eligible = eligible.len();

    let Some(store) = store else {
        publisher.publish_all(&eligible).await?;
        report.published = eligible.len();
        return Ok(report);
    };

    let mut announced = store.load(&options.today).await;
    let pending = apply(eligible, &[Predicate::not_already_announced(&announced)]);
    report.already_announced = report.eligible - pending.len();

    publisher.publish_all(&pending).await?;
    report.published = pending.len();

    announced.extend(pending);
    store.save(&announced).await?;
    Ok(report)
}
