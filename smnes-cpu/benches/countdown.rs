use criterion::{Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use smnes_cpu::{AluSel, Instruction, Machine, Opcode, Operand, Program};

/// Counts down from 65535 to 0, writing each value to the output cell
fn countdown() -> Program {
    let alu = AluSel::new(0);
    let i = |opcode, v: Option<u16>| {
        let operand = v.map(Operand::Literal).unwrap_or(Operand::Blank);
        Instruction::new(opcode, operand, alu)
    };
    Program::new(vec![
        i(Opcode::Rav, Some(16)),
        i(Opcode::Lva, Some(65535)),
        i(Opcode::Lvb, Some(1)),
        i(Opcode::Sub, None), // 3
        i(Opcode::Sta, None),
        i(Opcode::Laa, None),
        i(Opcode::Lvb, Some(0)),
        i(Opcode::Bre, Some(10)),
        i(Opcode::Lvb, Some(1)),
        i(Opcode::Bra, Some(3)),
        i(Opcode::Hlt, None), // 10
    ])
    .unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let program = countdown();
    c.bench_function("countdown", |b| {
        b.iter(|| {
            let mut vm = Machine::new(program.clone());
            let mut rng = StdRng::seed_from_u64(0);
            vm.run(&mut rng);
            std::hint::black_box(vm.output())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
