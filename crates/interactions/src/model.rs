use suite_locator::Locator;

/// Result of one successful interaction operation. Transient: produced and
/// consumed within a single call, never persisted.
#[derive(Debug, Clone)]
pub struct InteractionOutcome {
    /// The locator that ultimately produced the element.
    pub used: Locator,

    /// Locators tried during resolution, winner included.
    pub locators_tried: u32,

    /// Underlying action attempts (clicks, type passes), the successful one
    /// included.
    pub action_attempts: u32,
}
