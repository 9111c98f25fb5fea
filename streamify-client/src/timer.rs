use std::{convert::Infallible, time::Duration};

use crossbeam_channel::Sender;
use streamify_core::actor::{Act, Actor, ActorHandle};

use crate::cmd::Event;

enum HeroMsg {
    /// Start waiting, the first tick comes one interval later.
    Arm,
    Fire,
    Stop,
}

struct HeroTicker {
    interval: Duration,
    generation: u64,
    events: Sender<Event>,
}

impl Actor for HeroTicker {
    type Message = HeroMsg;
    type Error = Infallible;

    fn handle(&mut self, msg: Self::Message) -> Result<Act<Self>, Self::Error> {
        match msg {
            HeroMsg::Arm => Ok(self.wait()),
            HeroMsg::Fire => {
                let tick = Event::HeroTick {
                    generation: self.generation,
                };
                if self.events.send(tick).is_err() {
                    return Ok(Act::Shutdown);
                }
                Ok(self.wait())
            }
            HeroMsg::Stop => Ok(Act::Shutdown),
        }
    }
}

impl HeroTicker {
    fn wait(&self) -> Act<Self> {
        Act::WaitOr {
            timeout: self.interval,
            timeout_msg: HeroMsg::Fire,
        }
    }
}

/// Fixed-interval hero ticks tagged with `generation`.  Stopped on drop, so
/// replacing the timer cancels the old one.
pub struct HeroTimer {
    generation: u64,
    handle: ActorHandle<HeroMsg>,
}

impl HeroTimer {
    pub fn start(interval: Duration, generation: u64, events: Sender<Event>) -> Self {
        let ticker = HeroTicker {
            interval,
            generation,
            events,
        };
        let handle = ticker.spawn("hero_timer", 4);
        if handle.send(HeroMsg::Arm).is_err() {
            log::error!("hero timer is not running");
        }
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }
}

impl Drop for HeroTimer {
    fn drop(&mut self) {
        let _ = self.handle.send(HeroMsg::Stop);
    }
}
