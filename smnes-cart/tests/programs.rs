use std::path::Path;

use smnes_cart::{Screen, frame};
use cpu::{Halt, Key, Machine, Program};
use rand::{SeedableRng, rngs::StdRng};

fn load_demo(name: &str) -> Program {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .expect("CARGO_MANIFEST_DIR not set");
    let path = Path::new(&manifest_dir)
        .parent()
        .expect("missing parent directory")
        .join(format!("demos/{name}.smn"));
    let data = std::fs::read(&path).expect("could not read demo program");
    smnes_cart::load(&data).expect("failed to load demo program")
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

#[test]
fn add() {
    let mut vm = Machine::new(load_demo("add"));
    assert_eq!(vm.run(&mut rng()), Halt::Finished);
    assert_eq!(vm.output(), 8);
    assert_eq!(vm.pc(), 5);

    let empty = format!("{}\n", " .".repeat(16)).repeat(16);
    assert_eq!(frame(&vm), format!("[ OUTPUT: 8 ]\n{empty}[ PC: 5 ]\n"));
}

#[test]
fn checker() {
    let mut vm = Machine::new(load_demo("checker"));
    let r = vm.run_until(&mut rng(), |_, i| i > 1000);
    assert_eq!(r, Some(Halt::Finished));
    assert_eq!(vm.output(), 16);
    assert!(vm.ram().screen().iter().all(|&c| c == 0xA5A5));

    let s = Screen::new(vm.ram());
    for (y, row) in s.rows().enumerate() {
        for (x, p) in row.into_iter().enumerate() {
            assert_eq!(p, (x + y) % 2 == 0, "bad pixel at ({x}, {y})");
        }
    }

    let even = format!("{}\n", " # .".repeat(8));
    let odd = format!("{}\n", " . #".repeat(8));
    let grid = format!("{even}{odd}").repeat(8);
    assert_eq!(frame(&vm), format!("[ OUTPUT: 16 ]\n{grid}[ PC: 10 ]\n"));
}

#[test]
fn buttons() {
    let mut vm = Machine::new(load_demo("buttons"));
    let mut rng = rng();

    // Spins until a key is pressed
    assert_eq!(vm.run_until(&mut rng, |_, i| i >= 50), None);
    assert_eq!(vm.output(), 0);

    assert!(vm.press(Key::A));
    assert!(!vm.press(Key::B));
    assert_eq!(vm.run_until(&mut rng, |_, i| i >= 50), Some(Halt::Finished));
    assert_eq!(vm.output(), 4);
    assert!(!vm.input().has_pending());
}

#[test]
fn wait_for_key_then_stop() {
    // Slot 7 is reprogrammed before the key arrives
    let p = smnes_cart::parse("RIA 7 .\nRIV 99 .\nSIR . .\nSIR . .").unwrap();
    let mut vm = Machine::new(p);
    let mut rng = rng();
    assert_eq!(vm.step(&mut rng), None);
    assert_eq!(vm.step(&mut rng), None);
    assert!(vm.press(Key::B));
    assert_eq!(vm.step(&mut rng), None);
    assert_eq!(vm.ram().read(), 99);
    assert_eq!(vm.step(&mut rng), None);
    assert_eq!(vm.ram().read(), 0);
    assert_eq!(vm.step(&mut rng), Some(Halt::OutOfRange));
    assert_eq!(vm.pc(), 4);
}

#[test]
fn listing_survives_image() {
    for name in ["add", "checker", "buttons"] {
        let p = load_demo(name);
        let image = smnes_cart::to_bytes(&p);
        let q = smnes_cart::load(&image).unwrap();
        assert_eq!(smnes_cart::listing(&p), smnes_cart::listing(&q), "{name}");

        let a = Machine::new(p).run_until(&mut rng(), |_, i| i > 1000);
        let mut vm = Machine::new(q);
        let b = vm.run_until(&mut rng(), |_, i| i > 1000);
        assert_eq!(a, b, "{name}");
    }
}

#[test]
fn load_errors() {
    let e = smnes_cart::load(b"SMNC\x00\x01").unwrap_err();
    assert!(matches!(e, smnes_cart::Error::Image(_)));
    assert_eq!(e.to_string(), "cartridge image truncated (expected 1 lines)");

    let e = smnes_cart::load(b"HLT . .\nBRA\n").unwrap_err();
    assert!(matches!(
        e,
        smnes_cart::Error::Text(smnes_cart::LoadError::Syntax { line: 2, .. })
    ));

    let e = smnes_cart::load(b"\xff\xfe").unwrap_err();
    assert!(matches!(e, smnes_cart::Error::Encoding(_)));
}
