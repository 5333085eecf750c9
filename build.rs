use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        nrf52: { any(feature = "nrf52832", feature = "nrf52833", feature = "nrf52840") },
        // Port 1 is only bonded out on the larger packages.
        gpio_p1: { any(feature = "nrf52833", feature = "nrf52840") },
    }
}
