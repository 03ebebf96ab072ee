//! Animal state machine: youngster, adult, produce-ready, dead.

use crate::{DeathCause, FarmError, Transition};
use serde::Serialize;
use sim_core::AnimalKindSpec;
use sim_econ::{animal_base_value, animal_sale_value, product_value};
use std::fmt;
use tracing::debug;

/// Fed days an animal can miss before it starves.
const STARVATION_HUNGER: i32 = -3;
/// Happiness forced on an animal that went to bed hungry.
const HUNGRY_HAPPINESS: i32 = -10;
const PET_BONUS: i32 = 15;
const NEGLECT_PENALTY: i32 = 5;
const MAX_HAPPINESS: i32 = 100;

/// Display stage of an animal, in label priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AnimalStage {
    Dead,
    Produce,
    Adult,
    Youngster,
}

impl fmt::Display for AnimalStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnimalStage::Dead => "Dead",
            AnimalStage::Produce => "Produce",
            AnimalStage::Adult => "Adult",
            AnimalStage::Youngster => "Youngster",
        };
        f.write_str(s)
    }
}

/// A herded animal on one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Animal {
    spec: AnimalKindSpec,
    base_value: i64,
    age: u32,
    adult: bool,
    fed: bool,
    petted: bool,
    harvest_ready: bool,
    hunger: i32,
    happiness: i32,
    days_since_product: u32,
    dead: bool,
}

impl Animal {
    pub fn new(spec: &AnimalKindSpec) -> Self {
        Self {
            spec: spec.clone(),
            base_value: animal_base_value(spec.purchase_price),
            age: 0,
            adult: spec.age_to_adult == 0,
            fed: false,
            petted: false,
            harvest_ready: false,
            hunger: 0,
            happiness: 0,
            days_since_product: 0,
            dead: false,
        }
    }

    pub fn kind(&self) -> &str {
        &self.spec.kind
    }

    pub fn spec(&self) -> &AnimalKindSpec {
        &self.spec
    }

    /// Resale value before age and happiness scaling.
    pub fn base_value(&self) -> i64 {
        self.base_value
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_adult(&self) -> bool {
        self.adult
    }

    pub fn is_fed(&self) -> bool {
        self.fed
    }

    pub fn is_petted(&self) -> bool {
        self.petted
    }

    pub fn is_harvest_ready(&self) -> bool {
        self.harvest_ready
    }

    pub fn hunger(&self) -> i32 {
        self.hunger
    }

    pub fn happiness(&self) -> i32 {
        self.happiness
    }

    pub fn days_since_product(&self) -> u32 {
        self.days_since_product
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn stage(&self) -> AnimalStage {
        if self.dead {
            AnimalStage::Dead
        } else if self.harvest_ready {
            AnimalStage::Produce
        } else if self.adult {
            AnimalStage::Adult
        } else {
            AnimalStage::Youngster
        }
    }

    /// Feeding takes effect at the end of the day.
    pub fn feed(&mut self) {
        if !self.dead {
            self.fed = true;
        }
    }

    /// Petting takes effect at the end of the day.
    pub fn pet(&mut self) {
        if !self.dead {
            self.petted = true;
        }
    }

    /// Take the pending product, returning its value.
    pub fn collect_product(&mut self) -> Result<i64, FarmError> {
        if !self.harvest_ready {
            return Err(FarmError::PreconditionNotMet(format!(
                "{} has no product to collect",
                self.spec.kind
            )));
        }
        self.harvest_ready = false;
        let value = product_value(self.spec.base_product_value, self.happiness);
        debug!(kind = %self.spec.kind, value, happiness = self.happiness, "product collected");
        Ok(value)
    }

    /// Current sale value. Removing the animal is up to the caller.
    pub fn sell(&self) -> i64 {
        animal_sale_value(&self.spec, self.age, self.adult, self.happiness)
    }

    fn die(&mut self, cause: DeathCause) -> Transition {
        self.dead = true;
        self.harvest_ready = false;
        debug!(kind = %self.spec.kind, age = self.age, ?cause, "animal died");
        Transition::Died(cause)
    }

    /// Resolve feeding, then attention, then aging.
    pub fn advance_day(&mut self) -> Transition {
        if self.dead {
            return Transition::Unchanged;
        }
        let was_ready = self.harvest_ready;
        let mut transition = Transition::Unchanged;

        if self.fed {
            self.fed = false;
            if self.hunger < 0 {
                self.hunger += 1;
            } else if self.adult {
                self.days_since_product += 1;
                if self.days_since_product == self.spec.days_to_produce {
                    self.harvest_ready = true;
                    self.days_since_product = 0;
                }
            }
        } else {
            self.hunger -= 1;
            self.happiness = HUNGRY_HAPPINESS;
            if self.hunger == STARVATION_HUNGER {
                transition = self.die(DeathCause::Starved);
            }
        }

        if self.petted {
            self.petted = false;
            if self.happiness <= MAX_HAPPINESS - PET_BONUS {
                self.happiness += PET_BONUS;
            } else {
                self.happiness = MAX_HAPPINESS;
            }
        } else {
            self.happiness -= NEGLECT_PENALTY;
        }

        self.age += 1;
        if !self.adult && self.age >= self.spec.age_to_adult {
            self.adult = true;
            debug!(kind = %self.spec.kind, age = self.age, "animal grew up");
        }
        if self.age >= self.spec.age_max && !self.dead {
            transition = self.die(DeathCause::OldAge);
        }

        if transition == Transition::Unchanged && self.harvest_ready && !was_ready {
            transition = Transition::BecameReady;
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chicken() -> AnimalKindSpec {
        AnimalKindSpec {
            kind: "Chicken".into(),
            purchase_price: 250,
            age_to_adult: 2,
            age_max: 100,
            days_to_produce: 1,
            base_product_value: 5,
        }
    }

    fn live_day(a: &mut Animal, fed: bool, petted: bool) -> Transition {
        if fed {
            a.feed();
        }
        if petted {
            a.pet();
        }
        a.advance_day()
    }

    #[test]
    fn starves_after_three_hungry_days() {
        let mut a = Animal::new(&chicken());
        assert_eq!(live_day(&mut a, false, true), Transition::Unchanged);
        assert_eq!(a.hunger(), -1);
        live_day(&mut a, false, true);
        assert!(!a.is_dead());
        assert_eq!(live_day(&mut a, false, true), Transition::Died(DeathCause::Starved));
        assert!(a.is_dead());
        assert_eq!(a.stage(), AnimalStage::Dead);
    }

    #[test]
    fn hunger_recovers_before_production_resumes() {
        let mut a = Animal::new(&chicken());
        live_day(&mut a, true, false);
        live_day(&mut a, true, false);
        assert!(a.is_adult());
        live_day(&mut a, false, false);
        assert_eq!(a.hunger(), -1);
        // the first fed day only pays back hunger
        live_day(&mut a, true, false);
        assert_eq!(a.hunger(), 0);
        assert!(!a.is_harvest_ready());
        assert_eq!(live_day(&mut a, true, false), Transition::BecameReady);
    }

    #[test]
    fn produces_once_adult_and_fed() {
        let mut a = Animal::new(&chicken());
        live_day(&mut a, true, true);
        assert_eq!(a.stage(), AnimalStage::Youngster);
        live_day(&mut a, true, true);
        assert_eq!(a.stage(), AnimalStage::Adult);
        assert_eq!(live_day(&mut a, true, true), Transition::BecameReady);
        assert_eq!(a.stage(), AnimalStage::Produce);
        assert_eq!(a.happiness(), 45);
        // floor(45 / 25 * 5)
        assert_eq!(a.collect_product().unwrap(), 9);
        assert!(!a.is_harvest_ready());
        assert!(matches!(a.collect_product(), Err(FarmError::PreconditionNotMet(_))));
    }

    #[test]
    fn hungry_day_overrides_happiness() {
        let mut a = Animal::new(&chicken());
        for _ in 0..5 {
            live_day(&mut a, true, true);
        }
        assert_eq!(a.happiness(), 75);
        live_day(&mut a, false, false);
        assert_eq!(a.happiness(), -15);
        live_day(&mut a, false, true);
        assert_eq!(a.happiness(), 5);
    }

    #[test]
    fn happiness_caps_at_hundred_but_not_below() {
        let mut a = Animal::new(&chicken());
        for _ in 0..10 {
            live_day(&mut a, true, true);
        }
        assert_eq!(a.happiness(), 100);
        for _ in 0..30 {
            live_day(&mut a, true, false);
        }
        assert_eq!(a.happiness(), -50);
    }

    #[test]
    fn dies_of_old_age_even_when_cared_for() {
        let mut spec = chicken();
        spec.age_max = 4;
        let mut a = Animal::new(&spec);
        for _ in 0..3 {
            assert_ne!(live_day(&mut a, true, true), Transition::Died(DeathCause::OldAge));
        }
        assert_eq!(live_day(&mut a, true, true), Transition::Died(DeathCause::OldAge));
        assert_eq!(a.age(), 4);
        assert!(a.is_dead());
        assert!(!a.is_harvest_ready());
    }

    #[test]
    fn death_discards_pending_product() {
        let mut a = Animal::new(&chicken());
        for _ in 0..3 {
            live_day(&mut a, true, false);
        }
        assert!(a.is_harvest_ready());
        for _ in 0..3 {
            live_day(&mut a, false, false);
        }
        assert!(a.is_dead());
        assert!(!a.is_harvest_ready());
    }

    #[test]
    fn dead_animal_is_frozen() {
        let mut a = Animal::new(&chicken());
        for _ in 0..3 {
            live_day(&mut a, false, false);
        }
        let before = a.clone();
        a.feed();
        a.pet();
        assert_eq!(a.advance_day(), Transition::Unchanged);
        assert_eq!(a, before);
    }

    #[test]
    fn sale_uses_derived_base() {
        let a = Animal::new(&chicken());
        assert_eq!(a.base_value(), 62);
        assert_eq!(a.sell(), 62);
    }

    proptest! {
        #[test]
        fn fed_animal_never_starves(days in 1u32..99, pet in proptest::collection::vec(any::<bool>(), 99)) {
            let mut a = Animal::new(&chicken());
            for &p in pet.iter().take(days as usize) {
                let t = live_day(&mut a, true, p);
                prop_assert_ne!(t, Transition::Died(DeathCause::Starved));
                if a.is_harvest_ready() {
                    a.collect_product().unwrap();
                }
            }
            prop_assert!(!a.is_dead());
            prop_assert_eq!(a.hunger(), 0);
        }

        #[test]
        fn invariants_hold(steps in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 0..150)) {
            let spec = chicken();
            let mut a = Animal::new(&spec);
            for (fed, petted, collect) in steps {
                live_day(&mut a, fed, petted);
                if collect {
                    let _ = a.collect_product();
                }
                if !a.is_dead() {
                    prop_assert!(a.age() <= spec.age_max);
                    prop_assert_eq!(a.is_adult(), a.age() >= spec.age_to_adult);
                }
                if a.is_harvest_ready() {
                    prop_assert!(a.is_adult() && !a.is_dead());
                }
                prop_assert!(a.happiness() <= 100);
            }
        }
    }
}
