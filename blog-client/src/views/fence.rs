#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Hands out increasing tokens; only the newest one is current.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_current() {
        let mut sequence = RequestSequence::default();
        let first = sequence.next();
        assert!(sequence.is_current(first));

        let second = sequence.next();
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
    }
}
