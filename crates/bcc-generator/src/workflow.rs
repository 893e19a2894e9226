//! The bulk generation loop.
//!
//! Units are processed strictly in order, one remote call at a time. Each unit
//! first draws a code that is unknown locally, then tries to create it, moving
//! to a timestamped replacement code whenever the store reports a duplicate.
//! No failure aborts the batch; every unit ends with exactly one outcome.

use std::collections::HashSet;

use bcc_client::{CouponStore, RequestPacer};
use bcc_core::codes::{generate_code_with, timestamp_fragment};
use bcc_core::{conflict_code, conflict_code_escalated, generate_name, resolve_expiry};
use rand::Rng;

use crate::outcome::{CouponOutcome, GenerationReport};
use crate::request::GenerationRequest;

/// Retry bounds and pacing for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Candidate codes drawn per unit before giving up on that unit.
    pub max_code_attempts: u32,
    /// Create calls per unit, counting conflict retries.
    pub max_create_attempts: u32,
    /// Pause after every create call.
    pub create_pacer: RequestPacer,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            max_code_attempts: 100,
            max_create_attempts: 10,
            create_pacer: RequestPacer::from_millis(200),
        }
    }
}

impl GenerationPolicy {
    #[must_use]
    pub fn with_create_delay_ms(delay_ms: u64) -> Self {
        Self {
            create_pacer: RequestPacer::from_millis(delay_ms),
            ..Self::default()
        }
    }
}

/// State owned by one run: the codes it must avoid and what it has produced.
#[derive(Debug, Default)]
pub struct GenerationContext {
    existing: HashSet<String>,
    generated: HashSet<String>,
    outcomes: Vec<CouponOutcome>,
    created: u32,
    failed: u32,
}

impl GenerationContext {
    pub fn new<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            existing: existing.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Seeds the known codes from the store. A listing failure is logged and
    /// the run proceeds with nothing known.
    pub async fn seed<S: CouponStore>(store: &S) -> Self {
        match store.list_coupons().await {
            Ok(coupons) => {
                tracing::info!(existing = coupons.len(), "loaded existing coupon codes");
                Self::new(coupons.into_iter().map(|c| c.code))
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not list existing coupons; continuing without them");
                Self::default()
            }
        }
    }

    /// Whether `code` exists remotely or was already created in this run.
    #[must_use]
    pub fn is_known(&self, code: &str) -> bool {
        self.existing.contains(code) || self.generated.contains(code)
    }

    fn record(&mut self, outcome: CouponOutcome) -> &CouponOutcome {
        if outcome.is_created() {
            self.created += 1;
            self.generated.insert(outcome.code.clone());
            self.existing.insert(outcome.code.clone());
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
        &self.outcomes[self.outcomes.len() - 1]
    }

    #[must_use]
    pub fn into_report(self) -> GenerationReport {
        GenerationReport {
            outcomes: self.outcomes,
            created: self.created,
            failed: self.failed,
        }
    }
}

/// Draws candidates until one is unknown. `Err` carries the last candidate
/// when every attempt collided.
fn unique_code<R: Rng + ?Sized>(
    ctx: &GenerationContext,
    rng: &mut R,
    prefix: &str,
    max_attempts: u32,
) -> Result<String, String> {
    let mut candidate = generate_code_with(rng, prefix);
    for _ in 1..max_attempts {
        if !ctx.is_known(&candidate) {
            return Ok(candidate);
        }
        candidate = generate_code_with(rng, prefix);
    }
    if ctx.is_known(&candidate) {
        Err(candidate)
    } else {
        Ok(candidate)
    }
}

/// Runs a full batch against `store`.
///
/// `request` should already have passed [`GenerationRequest::validate`]; a
/// non-positive quantity produces an empty report. Each outcome is handed to
/// `on_outcome` as soon as it is recorded.
pub async fn run_generation<S, R, F>(
    store: &S,
    request: &GenerationRequest,
    policy: &GenerationPolicy,
    rng: &mut R,
    mut on_outcome: F,
) -> GenerationReport
where
    S: CouponStore,
    R: Rng + ?Sized,
    F: FnMut(&CouponOutcome),
{
    let quantity = u32::try_from(request.quantity).unwrap_or(0);
    let prefix = request.code_prefix.as_str();
    let expires = resolve_expiry(request.expiry_date.as_deref());

    tracing::info!(
        quantity,
        code_prefix = prefix,
        name_prefix = %request.name_prefix,
        targeting = %request.targeting,
        targets = request.target_ids.len(),
        expires = %expires,
        "starting coupon generation"
    );

    let mut ctx = GenerationContext::seed(store).await;
    policy.create_pacer.pause().await;

    for unit in 1..=quantity {
        let name = generate_name(&request.name_prefix, unit, quantity);

        let mut code = match unique_code(&ctx, rng, prefix, policy.max_code_attempts) {
            Ok(code) => code,
            Err(last) => {
                tracing::warn!(unit, "could not generate a unique code");
                on_outcome(ctx.record(CouponOutcome::failed(
                    last,
                    name,
                    format!(
                        "could not generate unique code after {} attempts",
                        policy.max_code_attempts
                    ),
                )));
                continue;
            }
        };

        let stamp = timestamp_fragment();
        let mut resolved = false;

        for attempt in 1..=policy.max_create_attempts {
            let payload = request.payload(&code, &name, &expires);
            match store.create_coupon(&payload).await {
                Ok(coupon) => {
                    tracing::info!(code = %code, id = coupon.id, name = %name, "coupon created");
                    on_outcome(ctx.record(CouponOutcome::created(code.clone(), name.clone(), coupon.id)));
                    resolved = true;
                }
                Err(failure) if failure.is_conflict() => {
                    let mut next = conflict_code(rng, prefix, stamp, attempt);
                    if ctx.is_known(&next) {
                        next = conflict_code_escalated(rng, prefix, stamp, attempt);
                    }
                    tracing::info!(
                        attempt,
                        max_attempts = policy.max_create_attempts,
                        rejected = %code,
                        next = %next,
                        "code already taken; retrying"
                    );
                    code = next;
                }
                Err(failure) => {
                    tracing::warn!(code = %code, error = %failure, "coupon create failed");
                    on_outcome(ctx.record(CouponOutcome::failed(
                        code.clone(),
                        name.clone(),
                        failure.message,
                    )));
                    resolved = true;
                }
            }

            policy.create_pacer.pause().await;
            if resolved {
                break;
            }
        }

        if !resolved {
            tracing::warn!(code = %code, unit, "giving up after repeated conflicts");
            on_outcome(ctx.record(CouponOutcome::failed(code, name, "max retries exceeded")));
        }
    }

    let report = ctx.into_report();
    tracing::info!(
        created = report.created,
        failed = report.failed,
        total = report.total(),
        "coupon generation finished"
    );
    report
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
