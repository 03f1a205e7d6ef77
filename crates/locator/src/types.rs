//! Locator descriptor model

use serde::{Deserialize, Serialize};
use std::fmt;
use suite_session::LocatorStrategy;

/// One way of finding one element: a strategy plus a selector value.
///
/// Inert and immutable; built once at page-object construction time. Several
/// locators may describe the same logical element (primary + fallbacks), in
/// which case they are carried together in a [`LocatorChain`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: LocatorStrategy,
    pub value: String,
}

impl Locator {
    pub fn new(strategy: LocatorStrategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    pub fn id(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Id, value)
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Name, value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::Css, value)
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::XPath, value)
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(LocatorStrategy::LinkText, value)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.name(), self.value)
    }
}

/// Ordered, non-empty sequence of locators for one logical element.
///
/// The primary locator comes first; fallbacks follow in declared priority
/// order. Order defines precedence, not mere availability: resolution stops
/// at the first locator that qualifies. Non-emptiness is enforced by
/// construction (`new` takes the primary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorChain {
    locators: Vec<Locator>,
}

impl LocatorChain {
    pub fn new(primary: Locator) -> Self {
        Self {
            locators: vec![primary],
        }
    }

    /// Append a fallback with the next-lower precedence.
    pub fn or(mut self, fallback: Locator) -> Self {
        self.locators.push(fallback);
        self
    }

    pub fn primary(&self) -> &Locator {
        &self.locators[0]
    }

    pub fn locators(&self) -> &[Locator] {
        &self.locators
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    /// Chains are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl From<Locator> for LocatorChain {
    fn from(primary: Locator) -> Self {
        Self::new(primary)
    }
}

impl fmt::Display for LocatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, locator) in self.locators.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{locator}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_preserves_declaration_order() {
        let chain = LocatorChain::new(Locator::css("#email"))
            .or(Locator::name("email"))
            .or(Locator::xpath("//input[@placeholder='Email']"));

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.primary(), &Locator::css("#email"));
        assert_eq!(chain.locators()[1], Locator::name("email"));
        assert_eq!(
            chain.to_string(),
            "css=#email -> name=email -> xpath=//input[@placeholder='Email']"
        );
    }

    #[test]
    fn single_locator_converts_to_chain() {
        let chain: LocatorChain = Locator::id("username").into();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.primary().value, "username");
    }
}
