/// A message in a bottle. Opens itself once per activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bottle {
    triggered: bool,
}

impl Bottle {
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// True the first time only; later calls are no-ops until [`Bottle::clear`].
    pub fn trigger(&mut self) -> bool {
        !std::mem::replace(&mut self.triggered, true)
    }

    pub fn clear(&mut self) {
        self.triggered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_once_until_cleared() {
        let mut bottle = Bottle::default();
        assert!(bottle.trigger());
        assert!(!bottle.trigger());
        assert!(bottle.is_triggered());

        bottle.clear();
        assert!(!bottle.is_triggered());
        assert!(bottle.trigger());
    }
}
