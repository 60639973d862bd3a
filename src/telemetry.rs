//! Reporting of broken scoring invariants.
//!
//! Invalid rolls are ordinary [`ScoreError`](crate::ScoreError)s. What this module
//! handles is the engine contradicting itself: a [`Frame`](crate::Frame) holding
//! more rolls than its kind allows, or a [`ScoreReport`](crate::ScoreReport) whose
//! frames skip a number or whose running score drops.
//!
//! [`InvariantChecker`] implementations describe the first broken rule as an
//! [`InvariantViolation`] tagged with a [`ViolationKind`]. The generator turns it
//! into a [`ScoringViolation`] and hands it to its [`ViolationObserver`], or to
//! [`TracingObserver`] when none is configured.
//!
//! ```
//! use tenpin::telemetry::CollectingObserver;
//! use tenpin::ScoreGenerator;
//! use std::sync::Arc;
//!
//! let observer = Arc::new(CollectingObserver::new());
//! let generator = ScoreGenerator::new().with_violation_observer(observer.clone());
//!
//! generator.generate(&[10, 7, 3, 9, 0]).unwrap();
//! assert!(observer.is_empty());
//! ```

use crate::FrameNumber;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// How far a violation undermines the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    /// Frames are well formed but a running score is wrong.
    Error,
    /// A frame or the frame sequence is malformed.
    Critical,
}

impl ViolationSeverity {
    /// Label for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the scoring model a violation concerns.
///
/// # Forward Compatibility
///
/// This enum is marked `#[non_exhaustive]`. Always include a wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ViolationKind {
    /// One frame's rolls are inconsistent with its kind.
    ///
    /// Examples:
    /// - More own rolls than the frame can take
    /// - Bonus rolls recorded on the last frame
    FrameState,
    /// The frames of a report do not form a valid sequence.
    ///
    /// Examples:
    /// - Gap or repeat in frame numbers
    /// - More frames than the game allows
    FrameSequence,
    /// Running scores disagree with the rolls.
    ///
    /// Examples:
    /// - Cumulative score decreasing from one frame to the next
    /// - A completed frame after an incomplete one
    Scoring,
}

impl ViolationKind {
    /// Label for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FrameState => "frame_state",
            Self::FrameSequence => "frame_sequence",
            Self::Scoring => "scoring",
        }
    }

    /// Structural breakage is critical; a wrong score over sound frames is an error.
    #[must_use]
    pub const fn severity(&self) -> ViolationSeverity {
        match self {
            Self::FrameState | Self::FrameSequence => ViolationSeverity::Critical,
            Self::Scoring => ViolationSeverity::Error,
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A violation as delivered to a [`ViolationObserver`].
///
/// Serializes with `serde`, so a collector can forward it as JSON.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ScoringViolation {
    /// Derived from `kind`.
    pub severity: ViolationSeverity,
    /// The category of the violation.
    pub kind: ViolationKind,
    /// The broken invariant, with the type that owns it.
    pub message: String,
    /// Source location where the violation was reported (file:line).
    pub location: &'static str,
    /// The frame the violation concerns, if any.
    pub frame: Option<FrameNumber>,
    /// Additional key-value context.
    pub context: BTreeMap<String, String>,
}

impl ScoringViolation {
    /// Creates a violation of `kind` with no frame and no context.
    #[must_use]
    pub fn new(kind: ViolationKind, message: impl Into<String>, location: &'static str) -> Self {
        Self {
            severity: kind.severity(),
            kind,
            message: message.into(),
            location,
            frame: None,
            context: BTreeMap::new(),
        }
    }

    /// Wraps a failed [`InvariantChecker::check_invariants`] result.
    ///
    /// Kind and frame are carried over; the details become a `details` context
    /// entry.
    #[must_use]
    pub fn from_invariant(violation: InvariantViolation, location: &'static str) -> Self {
        let InvariantViolation {
            kind,
            type_name,
            invariant,
            details,
            frame,
        } = violation;
        let mut reported = Self::new(kind, format!("{type_name}: {invariant}"), location);
        reported.frame = frame;
        if let Some(details) = details {
            reported = reported.with_context("details", details);
        }
        reported
    }

    /// Adds a context key-value pair.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

impl std::fmt::Display for ScoringViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}/{}] {} (at {}",
            self.severity, self.kind, self.message, self.location
        )?;
        if let Some(frame) = self.frame {
            write!(f, ", frame={frame}")?;
        }
        if !self.context.is_empty() {
            write!(f, ", context={:?}", self.context)?;
        }
        write!(f, ")")
    }
}

/// Receives violations found while scoring.
///
/// # Example
///
/// ```
/// use tenpin::telemetry::{ScoringViolation, ViolationObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct CountingObserver {
///     seen: AtomicUsize,
/// }
///
/// impl ViolationObserver for CountingObserver {
///     fn on_violation(&self, _violation: &ScoringViolation) {
///         self.seen.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
#[cfg(feature = "sync-send")]
pub trait ViolationObserver: Send + Sync {
    /// Called once per violation.
    fn on_violation(&self, violation: &ScoringViolation);
}

#[cfg(not(feature = "sync-send"))]
/// Receives violations found while scoring.
pub trait ViolationObserver {
    /// Called once per violation.
    fn on_violation(&self, violation: &ScoringViolation);
}

/// Logs violations with `tracing::error!`, one structured field per attribute.
///
/// Used whenever a generator has no observer of its own.
#[derive(Debug, Default, Clone)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new tracing observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ViolationObserver for TracingObserver {
    fn on_violation(&self, violation: &ScoringViolation) {
        let frame = violation.frame.map(FrameNumber::get);
        tracing::error!(
            severity = violation.severity.as_str(),
            kind = violation.kind.as_str(),
            location = violation.location,
            frame = ?frame,
            context = ?violation.context,
            "{}",
            violation.message
        );
    }
}

/// Keeps every violation it receives, for tests and for callers that want to
/// surface them after scoring.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    violations: Mutex<Vec<ScoringViolation>>,
}

impl CollectingObserver {
    /// Creates an observer with nothing collected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything collected so far, oldest first.
    #[must_use]
    pub fn violations(&self) -> Vec<ScoringViolation> {
        self.violations.lock().clone()
    }

    /// Number of collected violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.lock().len()
    }

    /// Nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.lock().is_empty()
    }

    /// At least one collected violation is of `kind`.
    #[must_use]
    pub fn has_violation(&self, kind: ViolationKind) -> bool {
        self.violations.lock().iter().any(|v| v.kind == kind)
    }
}

impl ViolationObserver for CollectingObserver {
    fn on_violation(&self, violation: &ScoringViolation) {
        self.violations.lock().push(violation.clone());
    }
}

/// Delivers `violation` to `observer`, or to [`TracingObserver`] if there is none.
pub fn report_to_observer(
    observer: Option<&Arc<dyn ViolationObserver>>,
    violation: &ScoringViolation,
) {
    match observer {
        Some(observer) => observer.on_violation(violation),
        None => TracingObserver.on_violation(violation),
    }
}

/// Reports an [`InvariantViolation`] through an `Option<Arc<dyn ViolationObserver>>`,
/// recording the call site as the location.
///
/// Extra `"key" => value` pairs become context entries.
///
/// ```
/// use tenpin::report_violation_to;
/// use tenpin::telemetry::{
///     CollectingObserver, InvariantViolation, ViolationKind, ViolationObserver,
/// };
/// use std::sync::Arc;
///
/// let collector = Arc::new(CollectingObserver::new());
/// let observer: Option<Arc<dyn ViolationObserver>> = Some(collector.clone());
///
/// let broken = InvariantViolation::new(ViolationKind::Scoring, "ScoreReport", "score decreased");
/// report_violation_to!(&observer, broken, "rolls" => 7);
///
/// assert!(collector.has_violation(ViolationKind::Scoring));
/// assert_eq!(collector.violations()[0].context["rolls"], "7");
/// ```
#[macro_export]
macro_rules! report_violation_to {
    ($observer:expr, $violation:expr $(, $key:literal => $value:expr)* $(,)?) => {{
        let violation = $crate::telemetry::ScoringViolation::from_invariant(
            $violation,
            concat!(file!(), ":", line!()),
        )
        $(.with_context($key, $value.to_string()))*;
        $crate::telemetry::report_to_observer($observer.as_ref(), &violation);
    }};
}

/// Asserts that an observer has collected nothing.
///
/// # Panics
///
/// Panics if the observer contains any violations, printing them for debugging.
#[macro_export]
macro_rules! assert_no_violations {
    ($observer:expr) => {{
        let violations = $observer.violations();
        assert!(
            violations.is_empty(),
            "Expected no violations, but found {}:\n{:#?}",
            violations.len(),
            violations
        );
    }};
}

// ==========================================
// Runtime Invariant Checking
// ==========================================

/// The first rule an [`InvariantChecker`] found broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// What the broken rule is about.
    pub kind: ViolationKind,
    /// Name of the type whose invariant was violated.
    pub type_name: &'static str,
    /// Description of the violated invariant.
    pub invariant: String,
    /// Values that show the breakage.
    pub details: Option<String>,
    /// The offending frame, if the rule concerns one.
    pub frame: Option<FrameNumber>,
}

impl InvariantViolation {
    /// Creates a violation of `kind` on `type_name`.
    #[must_use]
    pub fn new(kind: ViolationKind, type_name: &'static str, invariant: impl Into<String>) -> Self {
        Self {
            kind,
            type_name,
            invariant: invariant.into(),
            details: None,
            frame: None,
        }
    }

    /// Adds additional details to the violation.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Names the offending frame.
    #[must_use]
    pub fn with_frame(mut self, frame: FrameNumber) -> Self {
        self.frame = Some(frame);
        self
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.type_name, self.invariant)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// Types that can check their own structural invariants.
///
/// [`Frame`](crate::Frame) and [`ScoreReport`](crate::ScoreReport) implement it.
pub trait InvariantChecker {
    /// Returns the first broken invariant, if any.
    fn check_invariants(&self) -> Result<(), InvariantViolation>;
}

/// Checks a value's invariants in debug builds and reports a failure to an
/// `Option<Arc<dyn ViolationObserver>>`, with `$context` as a `context` entry.
///
/// Expands to nothing in release builds unless the `paranoid` feature is enabled.
#[macro_export]
#[cfg(any(debug_assertions, feature = "paranoid"))]
macro_rules! debug_check_invariants {
    ($observer:expr, $value:expr, $context:expr) => {{
        use $crate::telemetry::InvariantChecker as _;
        if let Err(violation) = $value.check_invariants() {
            $crate::report_violation_to!($observer, violation, "context" => $context);
        }
    }};
}

/// No-op version for release builds without `paranoid` feature.
#[macro_export]
#[cfg(not(any(debug_assertions, feature = "paranoid")))]
macro_rules! debug_check_invariants {
    ($observer:expr, $value:expr, $context:expr) => {{}};
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    fn frame(n: u8) -> FrameNumber {
        FrameNumber::new(n).unwrap()
    }

    fn observed(collector: &Arc<CollectingObserver>) -> Option<Arc<dyn ViolationObserver>> {
        Some(collector.clone())
    }

    #[test]
    fn severity_follows_kind() {
        assert_eq!(ViolationKind::FrameState.severity(), ViolationSeverity::Critical);
        assert_eq!(ViolationKind::FrameSequence.severity(), ViolationSeverity::Critical);
        assert_eq!(ViolationKind::Scoring.severity(), ViolationSeverity::Error);
        assert!(ViolationSeverity::Error < ViolationSeverity::Critical);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ViolationKind::FrameState.as_str(), "frame_state");
        assert_eq!(ViolationKind::FrameSequence.to_string(), "frame_sequence");
        assert_eq!(ViolationKind::Scoring.to_string(), "scoring");
    }

    #[test]
    fn invariant_violation_display() {
        let violation =
            InvariantViolation::new(ViolationKind::FrameState, "Frame", "too many own rolls")
                .with_details("own_rolls=4, max=3");
        assert_eq!(
            violation.to_string(),
            "Frame: too many own rolls (own_rolls=4, max=3)"
        );
    }

    #[test]
    fn from_invariant_keeps_kind_frame_and_details() {
        let violation = ScoringViolation::from_invariant(
            InvariantViolation::new(ViolationKind::Scoring, "ScoreReport", "score decreased")
                .with_frame(frame(7))
                .with_details("previous=87, current=80"),
            "report.rs:1",
        );

        assert_eq!(violation.kind, ViolationKind::Scoring);
        assert_eq!(violation.severity, ViolationSeverity::Error);
        assert_eq!(violation.frame, Some(frame(7)));
        assert_eq!(violation.message, "ScoreReport: score decreased");
        assert_eq!(
            violation.context.get("details").map(String::as_str),
            Some("previous=87, current=80")
        );

        let display = violation.to_string();
        assert!(display.starts_with("[error/scoring]"));
        assert!(display.contains("frame=7"));
    }

    #[test]
    fn report_to_observer_prefers_given_observer() {
        let collector = Arc::new(CollectingObserver::new());
        let violation = ScoringViolation::new(ViolationKind::FrameSequence, "gap", "test.rs:3");

        report_to_observer(observed(&collector).as_ref(), &violation);
        report_to_observer(None, &violation);

        assert_eq!(collector.len(), 1);
        assert!(collector.has_violation(ViolationKind::FrameSequence));
        assert!(!collector.has_violation(ViolationKind::Scoring));
    }

    #[test]
    fn report_violation_to_records_call_site_and_context() {
        let collector = Arc::new(CollectingObserver::new());
        let observer = observed(&collector);
        let broken = InvariantViolation::new(ViolationKind::FrameState, "Frame", "too many bonus rolls")
            .with_frame(frame(3));

        report_violation_to!(&observer, broken, "rolls" => 5, "context" => "after roll 4");

        let violations = collector.violations();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].location.contains("telemetry.rs:"));
        assert_eq!(violations[0].frame, Some(frame(3)));
        assert_eq!(violations[0].context["rolls"], "5");
        assert_eq!(violations[0].context["context"], "after roll 4");
    }

    #[test]
    fn violations_serialize_as_json() {
        let violation = ScoringViolation::new(ViolationKind::FrameState, "test", "test.rs:1");
        let value = serde_json::to_value(&violation).unwrap();
        assert_eq!(value["severity"], "critical");
        assert_eq!(value["kind"], "frame_state");
        assert_eq!(value["frame"], serde_json::Value::Null);
    }

    #[test]
    fn assert_no_violations_accepts_empty_collector() {
        let collector = CollectingObserver::new();
        assert_no_violations!(collector);
    }
}
