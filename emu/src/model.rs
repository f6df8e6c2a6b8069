use arch::alu;
use arch::op::{Dest, Jump, Op};
use arch::reg::{Reg, STACK_BASE};

pub const RAM_SIZE: usize = 0x8000;

pub struct State {
    rom: Vec<Op>,
    ram: Vec<u16>,
    a: u16,
    d: u16,
    pc: u16,
    halted: bool,
}

// Memory access
impl State {
    pub fn get(&self, addr: impl Into<u16>) -> u16 {
        self.ram[addr.into() as usize % RAM_SIZE]
    }

    pub fn set(&mut self, addr: impl Into<u16>, val: u16) {
        self.ram[addr.into() as usize % RAM_SIZE] = val;
    }

    /// Fills `RAM[from..to]` with `val`.
    pub fn fill(&mut self, from: u16, to: u16, val: u16) {
        for addr in from..to {
            self.set(addr, val);
        }
    }

    pub fn a(&self) -> u16 {
        self.a
    }

    pub fn d(&self) -> u16 {
        self.d
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// `RAM[256..SP]`
    pub fn stack(&self) -> &[u16] {
        let sp = (self.get(Reg::SP) as usize).clamp(STACK_BASE as usize, RAM_SIZE);
        &self.ram[STACK_BASE as usize..sp]
    }
}

impl State {
    pub fn new(rom: Vec<Op>) -> Self {
        State {
            rom,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            halted: false,
        }
    }

    /// Stopped in the `(END) @END 0;JMP` loop or ran off the end of ROM.
    pub fn is_terminated(&self) -> bool {
        self.halted
    }

    /// Executes one instruction. Returns its address and the instruction,
    /// or `None` once terminated.
    pub fn exec(&mut self) -> Option<(u16, Op)> {
        let pc = self.pc;
        let op = match self.rom.get(pc as usize) {
            Some(op) if !self.halted => *op,
            _ => {
                self.halted = true;
                return None;
            }
        };

        match op {
            Op::A(imm) => {
                self.a = imm;
                self.pc += 1;
            }
            Op::C(dest, comp, jump) => {
                let addr = self.a;
                let out = alu::eval(comp, self.d, addr, self.get(addr));
                if dest.m() {
                    self.set(addr, out);
                }
                if dest.d() {
                    self.d = out;
                }
                if dest.a() {
                    self.a = out;
                }
                if jump.test(out) {
                    self.halted = self.is_idle_loop(pc, addr, dest, jump);
                    self.pc = addr;
                } else {
                    self.pc += 1;
                }
            }
        }
        Some((pc, op))
    }

    fn is_idle_loop(&self, pc: u16, target: u16, dest: Dest, jump: Jump) -> bool {
        jump == Jump::JMP
            && dest == Dest::NULL
            && target.wrapping_add(1) == pc
            && self.rom.get(target as usize) == Some(&Op::A(target))
    }

    /// Runs until terminated or `tmax` steps. Returns the steps taken.
    pub fn run(&mut self, tmax: u64) -> u64 {
        let mut time = 0;
        while time < tmax && self.exec().is_some() {
            time += 1;
            if self.halted {
                break;
            }
        }
        time
    }
}
