use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::exception_private::{ExcType, RunError, SimpleException};

/// Error returned when a resource limit is exceeded during execution.
#[derive(Debug, Clone)]
pub enum ResourceError {
    /// Maximum number of user-defined classes exceeded.
    Classes { limit: usize, count: usize },
    /// Maximum execution time exceeded.
    Time { limit: Duration, elapsed: Duration },
    /// Maximum recursion depth exceeded.
    Recursion { limit: usize, depth: usize },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classes { limit, count } => {
                write!(f, "class limit exceeded: {count} > {limit}")
            }
            Self::Time { limit, elapsed } => {
                write!(f, "time limit exceeded: {elapsed:?} > {limit:?}")
            }
            Self::Recursion { .. } => {
                write!(f, "maximum recursion depth exceeded")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

impl ResourceError {
    /// Maps resource errors to exception types:
    /// - `Classes` → `MemoryError`
    /// - `Time` → `TimeoutError`
    /// - `Recursion` → `RecursionError`
    #[must_use]
    fn into_exception(self) -> SimpleException {
        let exc_type = match self {
            Self::Classes { .. } => ExcType::MemoryError,
            Self::Time { .. } => ExcType::TimeoutError,
            Self::Recursion { .. } => ExcType::RecursionError,
        };
        SimpleException::new_msg(exc_type, self)
    }
}

impl From<ResourceError> for RunError {
    fn from(err: ResourceError) -> Self {
        // RecursionError stays catchable, `try: f() except RecursionError:` must work.
        // Every other limit bypasses handlers so it cannot be swallowed.
        if matches!(err, ResourceError::Recursion { .. }) {
            Self::Exc(Box::new(err.into_exception()))
        } else {
            Self::UncatchableExc(Box::new(err.into_exception()))
        }
    }
}

/// Trait for tracking resource usage of a runtime.
pub trait ResourceTracker: fmt::Debug {
    /// Called before a user class is registered.
    ///
    /// # Arguments
    /// * `class_count` - number of user classes including the one about to be registered
    fn on_define_class(&mut self, class_count: usize) -> Result<(), ResourceError>;

    /// Checks that a call at `current_depth` does not exceed the recursion limit.
    fn check_recursion_depth(&self, current_depth: usize) -> Result<(), ResourceError>;

    /// Checks the elapsed execution time, called before every call pushes its frame.
    fn check_time(&self) -> Result<(), ResourceError>;

    /// Longest linearization a new class may have.
    fn max_mro_length(&self) -> usize {
        MAX_MRO_LENGTH
    }
}

/// Tracker that only enforces the default recursion limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLimitTracker;

impl ResourceTracker for NoLimitTracker {
    #[inline]
    fn on_define_class(&mut self, _class_count: usize) -> Result<(), ResourceError> {
        Ok(())
    }

    #[inline]
    fn check_recursion_depth(&self, current_depth: usize) -> Result<(), ResourceError> {
        if current_depth > DEFAULT_MAX_RECURSION_DEPTH {
            Err(ResourceError::Recursion {
                limit: DEFAULT_MAX_RECURSION_DEPTH,
                depth: current_depth,
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    fn check_time(&self) -> Result<(), ResourceError> {
        Ok(())
    }
}

/// Default maximum call depth, matching CPython's default `sys.getrecursionlimit()`.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1000;

/// Maximum number of entries in a computed linearization.
///
/// Deep hierarchies are legitimate but unbounded ones are not; this comfortably covers
/// any hand-written class tree.
pub const MAX_MRO_LENGTH: usize = 2600;

/// Maximum MRO length of a single base class.
pub const MAX_INHERITANCE_DEPTH: usize = 1000;

/// Configuration for a [`LimitedTracker`].
///
/// All limits are optional. Built with the setter methods:
///
/// ```
/// use raiseflow::ResourceLimits;
///
/// let limits = ResourceLimits::new().max_classes(50).max_recursion_depth(Some(64));
/// assert_eq!(limits.get_max_classes(), Some(50));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceLimits {
    max_classes: Option<usize>,
    max_duration: Option<Duration>,
    max_recursion_depth: Option<usize>,
    max_mro_length: Option<usize>,
}

impl ResourceLimits {
    /// Creates a new ResourceLimits with all limits disabled, except max recursion which is set to 1000.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_recursion_depth: Some(DEFAULT_MAX_RECURSION_DEPTH),
            ..Default::default()
        }
    }

    /// Sets the maximum number of user-defined classes.
    #[must_use]
    pub fn max_classes(mut self, limit: usize) -> Self {
        self.max_classes = Some(limit);
        self
    }

    /// Sets the maximum execution duration.
    #[must_use]
    pub fn max_duration(mut self, limit: Duration) -> Self {
        self.max_duration = Some(limit);
        self
    }

    /// Sets the maximum recursion depth (call stack depth). `None` disables the check.
    #[must_use]
    pub fn max_recursion_depth(mut self, limit: Option<usize>) -> Self {
        self.max_recursion_depth = limit;
        self
    }

    /// Sets the maximum linearization length of a new class.
    #[must_use]
    pub fn max_mro_length(mut self, limit: usize) -> Self {
        self.max_mro_length = Some(limit);
        self
    }

    #[must_use]
    pub fn get_max_classes(&self) -> Option<usize> {
        self.max_classes
    }

    #[must_use]
    pub fn get_max_recursion_depth(&self) -> Option<usize> {
        self.max_recursion_depth
    }
}

/// A resource tracker that enforces configurable limits.
///
/// When deserialized, `start_time` is reset to `Instant::now()`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct LimitedTracker {
    limits: ResourceLimits,
    #[serde(skip, default = "Instant::now")]
    start_time: Instant,
}

impl LimitedTracker {
    /// Creates a new LimitedTracker with the given limits.
    ///
    /// The start time is recorded when the tracker is created, so create
    /// it immediately before starting execution.
    #[must_use]
    pub fn new(limits: ResourceLimits) -> Self {
        Self {
            limits,
            start_time: Instant::now(),
        }
    }

    #[must_use]
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Returns the elapsed time since tracker creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl ResourceTracker for LimitedTracker {
    fn on_define_class(&mut self, class_count: usize) -> Result<(), ResourceError> {
        match self.limits.max_classes {
            Some(limit) if class_count > limit => Err(ResourceError::Classes {
                limit,
                count: class_count,
            }),
            _ => Ok(()),
        }
    }

    fn check_recursion_depth(&self, current_depth: usize) -> Result<(), ResourceError> {
        match self.limits.max_recursion_depth {
            Some(limit) if current_depth > limit => Err(ResourceError::Recursion {
                limit,
                depth: current_depth,
            }),
            _ => Ok(()),
        }
    }

    fn check_time(&self) -> Result<(), ResourceError> {
        if let Some(limit) = self.limits.max_duration {
            let elapsed = self.start_time.elapsed();
            if elapsed > limit {
                return Err(ResourceError::Time { limit, elapsed });
            }
        }
        Ok(())
    }

    fn max_mro_length(&self) -> usize {
        self.limits.max_mro_length.unwrap_or(MAX_MRO_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recursion_error_is_catchable() {
        let err: RunError = ResourceError::Recursion { limit: 3, depth: 4 }.into();
        assert!(err.is_exception_type(ExcType::RecursionError));
        assert_eq!(err.to_string(), "RecursionError: maximum recursion depth exceeded");
    }

    #[test]
    fn class_limit_is_uncatchable() {
        let err: RunError = ResourceError::Classes { limit: 1, count: 2 }.into();
        let RunError::UncatchableExc(exc) = err else {
            panic!("expected uncatchable error");
        };
        assert_eq!(exc.exc_type(), ExcType::MemoryError);
        assert_eq!(exc.py_str(), "class limit exceeded: 2 > 1");
    }

    #[test]
    fn limited_tracker_checks() {
        let mut tracker = LimitedTracker::new(ResourceLimits::new().max_classes(2).max_recursion_depth(Some(5)));
        assert!(tracker.on_define_class(2).is_ok());
        assert!(tracker.on_define_class(3).is_err());
        assert!(tracker.check_recursion_depth(5).is_ok());
        assert!(tracker.check_recursion_depth(6).is_err());
        assert!(tracker.check_time().is_ok());
        assert_eq!(tracker.max_mro_length(), MAX_MRO_LENGTH);
    }

    #[test]
    fn zero_duration_times_out() {
        let tracker = LimitedTracker::new(ResourceLimits::new().max_duration(Duration::ZERO));
        std::thread::sleep(Duration::from_millis(1));
        assert!(matches!(tracker.check_time(), Err(ResourceError::Time { .. })));
    }
}
