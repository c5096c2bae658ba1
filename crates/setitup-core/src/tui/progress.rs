//! Spinner-backed execution progress

use crate::execute::Progress;
use cliclack::ProgressBar;
use std::cell::RefCell;

/// One spinner per step; the previous step is marked done when the next starts
#[derive(Default)]
pub struct SpinnerProgress {
    current: RefCell<Option<(ProgressBar, String)>>,
}

impl SpinnerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the running spinner, if any, as succeeded
    pub fn finish(&self) {
        if let Some((spinner, label)) = self.current.borrow_mut().take() {
            spinner.stop(label);
        }
    }

    /// Stop the running spinner, if any, as failed
    pub fn fail(&self) {
        if let Some((spinner, label)) = self.current.borrow_mut().take() {
            spinner.error(label);
        }
    }
}

impl Progress for SpinnerProgress {
    fn step(&self, label: &str) {
        self.finish();
        let spinner = cliclack::spinner();
        spinner.start(format!("{}...", label));
        *self.current.borrow_mut() = Some((spinner, label.to_string()));
    }

    fn warn(&self, label: &str, _message: &str) {
        // details are listed after the run
        match self.current.borrow_mut().take() {
            Some((spinner, _)) => spinner.error(format!("{} (with warnings)", label)),
            None => {
                let _ = cliclack::log::warning(format!("{} (with warnings)", label));
            }
        }
    }

    fn suspend(&self) {
        if let Some((spinner, label)) = self.current.borrow_mut().take() {
            spinner.stop(format!("{} (interactive)", label));
        }
    }

    fn resume(&self, label: &str) {
        let spinner = cliclack::spinner();
        spinner.start(format!("{}...", label));
        *self.current.borrow_mut() = Some((spinner, label.to_string()));
    }
}
