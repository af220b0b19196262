use alloc::boxed::Box;
use alloc::format;
use alloc::vec::Vec;

use log::debug;

use crate::class::Class;
use crate::instance::{Builder, Criteria};
use crate::{Bind, Error, Result};

/// Chooses between the constructors of a composite.
///
/// The builder with the highest score wins, the first declared on a tie.
#[derive(Debug, Clone, Default)]
pub struct Creator {
    builders: Vec<Builder>,
}

impl Creator {
    pub fn new(builders: Vec<Builder>) -> Self {
        Self { builders }
    }

    #[inline]
    pub fn builders(&self) -> &[Builder] {
        &self.builders
    }

    /// The best builder for the values in `criteria`.
    pub fn select(&self, criteria: &Criteria<'_>) -> Option<(&Builder, usize)> {
        let mut best: Option<(&Builder, usize)> = None;
        for builder in &self.builders {
            let Some(score) = builder.score(criteria) else {
                continue;
            };
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((builder, score));
            }
        }
        best
    }

    pub fn instantiate(&self, class: &'static Class, criteria: &mut Criteria<'_>) -> Result<Box<dyn Bind>> {
        let Some((builder, score)) = self.select(criteria) else {
            return Err(Error::Instantiation(format!("Constructor not matched for {class}")));
        };
        debug!("constructor '{}' of {class} selected with score {score}", builder.name());
        builder.instantiate(criteria)
    }
}
