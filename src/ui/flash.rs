use std::time::Duration;

/// Half-phases of the blink: on, off, on, off...
pub const FLASH_TOGGLES: u8 = 6;
pub const FLASH_PERIOD: Duration = Duration::from_millis(250);

/// Blinks the revealed answer a few times after a round locks.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    toggles_left: u8,
    lit: bool,
    since_toggle: Duration,
}

impl Flash {
    pub fn start(&mut self) {
        self.toggles_left = FLASH_TOGGLES;
        self.lit = true;
        self.since_toggle = Duration::ZERO;
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    pub fn update(&mut self, elapsed: Duration) {
        if !self.is_active() {
            return;
        }
        self.since_toggle += elapsed;
        while self.since_toggle >= FLASH_PERIOD && self.toggles_left > 0 {
            self.since_toggle -= FLASH_PERIOD;
            self.toggles_left -= 1;
            self.lit = !self.lit;
        }
        if self.toggles_left == 0 {
            // settle on the highlighted look
            self.lit = true;
        }
    }

    pub fn is_active(&self) -> bool {
        self.toggles_left > 0
    }

    /// Whether the highlight is showing right now. Always true once the blink is over.
    pub fn is_lit(&self) -> bool {
        self.lit || !self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_flash_is_lit_and_inactive() {
        let flash = Flash::default();
        assert!(!flash.is_active());
        assert!(flash.is_lit());
    }

    #[test]
    fn test_blinks_then_settles() {
        let mut flash = Flash::default();
        flash.start();
        assert!(flash.is_lit());

        flash.update(FLASH_PERIOD);
        assert!(!flash.is_lit());
        flash.update(FLASH_PERIOD);
        assert!(flash.is_lit());

        flash.update(FLASH_PERIOD * 10);
        assert!(!flash.is_active());
        assert!(flash.is_lit());
    }

    #[test]
    fn test_stop_ends_blink() {
        let mut flash = Flash::default();
        flash.start();
        flash.stop();
        assert!(!flash.is_active());
    }
}
