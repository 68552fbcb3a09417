use cortex_m_log::printer::dummy::Dummy;
#[cfg(log = "log_itm")]
use cortex_m_log::{destination::Itm as ItmDestination, modes::InterruptOk,
                   printer::itm::Itm};

#[cfg(log = "log_itm")]
pub type T = Itm<InterruptOk>;
#[cfg(not(log = "log_itm"))]
pub type T = Dummy;

/// Builds the printer selected by the `log` feature group.
#[cfg(log = "log_itm")]
pub fn create(itm: cortex_m::peripheral::ITM) -> T {
    Itm::<InterruptOk>::new(ItmDestination::new(itm))
}

/// Builds the printer selected by the `log` feature group.
#[cfg(not(log = "log_itm"))]
pub fn create(_itm: cortex_m::peripheral::ITM) -> T {
    Dummy::new()
}

/// Printer that swallows everything; for hosts and tests.
pub fn silent() -> Dummy {
    Dummy::new()
}

macro_rules! debug_guard {
    ($($args:tt)+) => {
        if cfg!(level = "level_debug") {
            $($args)+;
        }
    }
}

macro_rules! info_guard {
    ($($args:tt)+) => {
        if cfg!(level = "level_debug") || cfg!(level = "level_info") {
            $($args)+;
        }
    }
}

// Write failures are dropped: logging must never take the control loop
// down.
macro_rules! emit {
    ($printer:expr, $($args:tt)+) => {{
        #[allow(unused_imports)]
        use core::fmt::Write as _;
        #[allow(unused_imports)]
        use cortex_m_log::printer::Printer as _;
        let _ = writeln!($printer.destination(), $($args)+);
    }}
}

macro_rules! debug {
    (
        $printer: expr,
        $($args:tt)+
    ) => {
        debug_guard!(emit!($printer, $($args)+))
    }
}

macro_rules! info {
    (
        $printer:expr,
        $($args:tt)+
    ) => {
        info_guard!(emit!($printer, $($args)+))
    }
}

macro_rules! error {
    (
        $printer:expr,
        $($args:tt)+
    ) => {
        emit!($printer, $($args)+)
    }
}

macro_rules! writelnfloats {
    (
        $w:expr,
        $prelude:expr,
        $($exprs:expr),* $(,)*
    ) => {
        {
            #[allow(unused_imports)]
            use core::fmt::Write as _;
            let w = $w;
            let _ = w.write_str($prelude);
            $(
                let mut b = ryu::Buffer::new();
                let s = b.format($exprs);
                let _ = w.write_str(s);
                let _ = w.write_char(';');
            )+
            let _ = w.write_char('\n');
        }
    }
}

#[allow(unused_macros)]
macro_rules! infofloats {
    (
        $printer:expr,
        $prelude:expr,
        $($exprs:expr),* $(,)*
    ) => {
        info_guard!({
            #[allow(unused_imports)]
            use cortex_m_log::printer::Printer as _;
            writelnfloats!($printer.destination(), $prelude, $($exprs, )+)
        })
    }
}

macro_rules! debugfloats {
    (
        $printer:expr,
        $prelude:expr,
        $($exprs:expr),* $(,)*
    ) => {
        debug_guard!({
            #[allow(unused_imports)]
            use cortex_m_log::printer::Printer as _;
            writelnfloats!($printer.destination(), $prelude, $($exprs, )+)
        })
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn macros_write_through_dummy_printer() {
        let mut log = super::silent();
        info!(log, "mode {}", 1);
        debug!(log, "tick");
        error!(log, "bad {:?}", "thing");
        debugfloats!(log, "err:", 0.5f32, -1.0f32);
    }
}
