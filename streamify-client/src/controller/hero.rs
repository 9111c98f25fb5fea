use crate::{data::ItemRef, delegate::Delegate, timer::HeroTimer};

impl Delegate {
    /// Cancel the running timer and start over on the current catalog.  An
    /// empty catalog leaves the rotator idle without a timer.
    pub(crate) fn restart_hero(&mut self) {
        self.stop_hero();
        let len = self.state.catalog.catalog.featured.len();
        if self.state.hero.reset(len) {
            let timer = HeroTimer::start(
                self.config.hero_interval(),
                self.hero_generation,
                self.sender(),
            );
            log::debug!("hero timer started, generation {}", timer.generation());
            self.hero_timer = Some(timer);
        }
    }

    pub(crate) fn stop_hero(&mut self) {
        // Dropping the timer stops it, bumping the generation discards the
        // ticks it already sent.
        self.hero_timer = None;
        self.hero_generation += 1;
    }

    pub(crate) fn hero_tick(&mut self, generation: u64) {
        if generation != self.hero_generation {
            log::debug!("ignoring hero tick of generation {}", generation);
            return;
        }
        self.state.hero.tick();
    }

    /// Open the detail flow for the featured item, the timer keeps running.
    pub(crate) fn select_hero(&mut self) {
        match self.state.hero.current() {
            Some(index) => self.open_detail(ItemRef::Featured(index)),
            None => self.state.info_alert("Nothing is featured right now."),
        }
    }

    pub fn hero_generation(&self) -> u64 {
        self.hero_generation
    }

    pub fn hero_timer_running(&self) -> bool {
        self.hero_timer.as_ref().is_some_and(|timer| timer.is_running())
    }
}
