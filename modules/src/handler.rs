use crate::events::ModuleEvent;
use crate::prelude::*;
use core::marker::PhantomData;

pub type HandlerResult<T, E> = Result<HandlerOutput<T>, E>;

/// The output of a handler: its result, the log lines and the events it produced.
#[derive(Clone, Debug)]
pub struct HandlerOutput<T, Event = ModuleEvent> {
    pub result: T,
    pub log: Vec<String>,
    pub events: Vec<Event>,
}

impl<T, E> HandlerOutput<T, E> {
    pub fn builder() -> HandlerOutputBuilder<T, E> {
        HandlerOutputBuilder::new()
    }
}

#[derive(Clone, Debug)]
pub struct HandlerOutputBuilder<T, E = ModuleEvent> {
    log: Vec<String>,
    events: Vec<E>,
    marker: PhantomData<T>,
}

impl<T, E> HandlerOutputBuilder<T, E> {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            events: Vec::new(),
            marker: PhantomData,
        }
    }

    pub fn with_log(mut self, log: impl Into<Vec<String>>) -> Self {
        self.merge_log(log);
        self
    }

    pub fn log(&mut self, log: impl Into<String>) {
        self.log.push(log.into());
    }

    pub fn with_events(mut self, mut events: Vec<E>) -> Self {
        self.events.append(&mut events);
        self
    }

    pub fn emit(&mut self, event: impl Into<E>) {
        self.events.push(event.into());
    }

    pub fn with_result(self, result: T) -> HandlerOutput<T, E> {
        HandlerOutput {
            result,
            log: self.log,
            events: self.events,
        }
    }

    pub fn merge<NewT>(&mut self, other: HandlerOutputBuilder<NewT, E>) {
        let HandlerOutputBuilder {
            mut log,
            mut events,
            ..
        } = other;
        self.log.append(&mut log);
        self.events.append(&mut events);
    }

    pub fn merge_output<NewT>(&mut self, other: HandlerOutput<NewT, E>) {
        let HandlerOutput {
            mut log,
            mut events,
            ..
        } = other;
        self.log.append(&mut log);
        self.events.append(&mut events);
    }

    pub fn logs(&self) -> &[String] {
        &self.log
    }

    pub fn events(&self) -> &[E] {
        &self.events
    }

    fn merge_log(&mut self, log: impl Into<Vec<String>>) {
        let mut log = log.into();
        self.log.append(&mut log);
    }
}

impl<T, E> Default for HandlerOutputBuilder<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// The output builder handed to application callbacks. Acts as the event sink of the host.
pub type ModuleOutputBuilder = HandlerOutputBuilder<(), ModuleEvent>;
