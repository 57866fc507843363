//! Success/failure classification of a response status.

/// Which caller callback a response is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Rule deciding the [`Outcome`] of a response status.
///
/// A missing status always means failure. This is how timeouts and network
/// errors are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any non-zero status is a success, regardless of magnitude.
    #[default]
    Truthy,
    /// `200..=299` and `304` are successes, everything else is a failure.
    HttpSuccess,
}

impl StatusPolicy {
    pub fn outcome(&self, status: Option<u16>) -> Outcome {
        let success = match (self, status) {
            (_, None) | (_, Some(0)) => false,
            (StatusPolicy::Truthy, Some(_)) => true,
            (StatusPolicy::HttpSuccess, Some(s)) => (200..300).contains(&s) || s == 304,
        };

        if success {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}
