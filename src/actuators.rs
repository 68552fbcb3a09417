//! Actuator interfaces and their PWM implementations.

use ehal::PwmPin;
use libm::roundf;

pub trait MotorDriver {
    fn setup(&mut self) {}
    fn set_steer(&mut self, steer: f32);
    fn set_thrust(&mut self, thrust: f32);
}

/// Position servo that must be enabled to track its setpoint.
pub trait ServoDriver {
    fn setup(&mut self);
    fn start(&mut self);
    fn stop(&mut self);
    fn set_position(&mut self, position: f32);
}

/// Two propulsion motors steering by differential thrust:
/// left = thrust + steer, right = thrust - steer, each in [0, 1].
pub struct PwmMotors<L, R> {
    left: L,
    right: R,
    thrust: f32,
    steer: f32,
}

impl<L, R> PwmMotors<L, R>
    where L: PwmPin<Duty = u32>,
          R: PwmPin<Duty = u32>
{
    pub fn new(left: L, right: R) -> Self {
        PwmMotors { left, right, thrust: 0.0, steer: 0.0 }
    }

    pub fn duty(&self) -> (u32, u32) {
        (self.left.get_duty(), self.right.get_duty())
    }

    fn mix(&mut self) {
        let left = (self.thrust + self.steer).clamp(0.0, 1.0);
        let right = (self.thrust - self.steer).clamp(0.0, 1.0);
        let max = self.left.get_max_duty() as f32;
        self.left.set_duty(roundf(left * max) as u32);
        let max = self.right.get_max_duty() as f32;
        self.right.set_duty(roundf(right * max) as u32);
    }
}

impl<L, R> MotorDriver for PwmMotors<L, R>
    where L: PwmPin<Duty = u32>,
          R: PwmPin<Duty = u32>
{
    fn setup(&mut self) {
        self.thrust = 0.0;
        self.steer = 0.0;
        self.mix();
        self.left.enable();
        self.right.enable();
    }

    fn set_steer(&mut self, steer: f32) {
        if steer.is_finite() {
            self.steer = steer;
        }
        self.mix();
    }

    fn set_thrust(&mut self, thrust: f32) {
        if thrust.is_finite() {
            self.thrust = thrust;
        }
        self.mix();
    }
}

// 50 Hz frame, 1 ms .. 2 ms pulse
const FRAME_MS: f32 = 20.0;
const CENTER_MS: f32 = 1.5;
const HALF_TRAVEL_MS: f32 = 0.5;

/// Hobby servo on a 50 Hz PWM channel; position in [-1, 1].
pub struct PwmServo<P> {
    pin: P,
    running: bool,
    position: f32,
}

impl<P> PwmServo<P> where P: PwmPin<Duty = u32>
{
    pub fn new(pin: P) -> Self {
        PwmServo { pin, running: false, position: 0.0 }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn duty(&self) -> u32 {
        self.pin.get_duty()
    }

    fn duty_for(&self, position: f32) -> u32 {
        let pulse_ms = CENTER_MS + HALF_TRAVEL_MS * position.clamp(-1.0, 1.0);
        roundf(pulse_ms / FRAME_MS * self.pin.get_max_duty() as f32) as u32
    }
}

impl<P> ServoDriver for PwmServo<P> where P: PwmPin<Duty = u32>
{
    fn setup(&mut self) {
        self.pin.disable();
        self.running = false;
        self.position = 0.0;
        let neutral = self.duty_for(0.0);
        self.pin.set_duty(neutral);
    }

    fn start(&mut self) {
        self.pin.enable();
        self.running = true;
    }

    fn stop(&mut self) {
        self.pin.disable();
        self.running = false;
    }

    fn set_position(&mut self, position: f32) {
        if !self.running || !position.is_finite() {
            return;
        }
        self.position = position.clamp(-1.0, 1.0);
        let duty = self.duty_for(self.position);
        self.pin.set_duty(duty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePin {
        duty: u32,
        enabled: bool,
    }

    impl FakePin {
        fn new() -> Self {
            FakePin { duty: 0, enabled: false }
        }
    }

    impl PwmPin for FakePin {
        type Duty = u32;

        fn disable(&mut self) {
            self.enabled = false;
        }

        fn enable(&mut self) {
            self.enabled = true;
        }

        fn get_duty(&self) -> u32 {
            self.duty
        }

        fn get_max_duty(&self) -> u32 {
            10_000
        }

        fn set_duty(&mut self, duty: u32) {
            self.duty = duty;
        }
    }

    #[test]
    fn motors_mix_thrust_and_steer() {
        let mut m = PwmMotors::new(FakePin::new(), FakePin::new());
        m.setup();
        assert!(m.left.enabled && m.right.enabled);
        m.set_thrust(0.5);
        assert_eq!(m.duty(), (5000, 5000));
        m.set_steer(0.25);
        assert_eq!(m.duty(), (7500, 2500));
        m.set_steer(-1.0);
        assert_eq!(m.duty(), (0, 10_000));
    }

    #[test]
    fn motors_ignore_non_finite_commands() {
        let mut m = PwmMotors::new(FakePin::new(), FakePin::new());
        m.setup();
        m.set_thrust(0.5);
        m.set_thrust(f32::NAN);
        assert_eq!(m.duty(), (5000, 5000));
    }

    #[test]
    fn servo_only_moves_while_started() {
        let mut s = PwmServo::new(FakePin::new());
        s.setup();
        assert_eq!(s.duty(), 750);
        assert!(!s.pin.enabled);

        s.set_position(1.0);
        assert_eq!(s.duty(), 750);

        s.start();
        assert!(s.pin.enabled);
        s.set_position(1.0);
        assert_eq!(s.duty(), 1000);
        s.set_position(-3.0);
        assert_eq!(s.duty(), 500);
        assert_eq!(s.position(), -1.0);

        s.stop();
        assert!(!s.is_running() && !s.pin.enabled);
    }
}
