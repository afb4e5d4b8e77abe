//! 8080 instruction execution.
//!
//! Register fields follow the usual encoding: 0-5 are B C D E H L, 6 is the
//! byte at (HL) and 7 is A. Register pairs are BC, DE, HL and SP (or PSW for
//! PUSH/POP).

use emu_core::{AluResult, Bus, alu};

use crate::I8080;
use crate::flags::{self, ACF, CF, ONE, PF, SF, ZF};

/// Register field value meaning "memory at HL".
const M: u8 = 6;

impl I8080 {
    /// Execute an opcode that has already been fetched (or acknowledged).
    pub(crate) fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let dst = (opcode >> 3) & 7;
        let src = opcode & 7;
        let rp = (opcode >> 4) & 3;

        match opcode {
            // NOP and its aliases
            0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => {}

            // HLT - 7 states
            0x76 => {
                self.clock.idle(3);
                self.halted = true;
                log::trace!("8080 halted at ${:04X}", self.regs.pc.wrapping_sub(1));
            }

            // MOV r,r' - 5 states, 7 with memory
            0x40..=0x7F => {
                let value = self.load(bus, src);
                if src != M && dst != M {
                    self.clock.idle(1);
                }
                self.store(bus, dst, value);
            }

            // ALU A,r
            0x80..=0xBF => {
                let value = self.load(bus, src);
                self.arithmetic(dst, value);
            }

            // ALU A,imm
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => {
                let value = self.fetch(bus);
                self.arithmetic(dst, value);
            }

            // MVI r,imm
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
                let value = self.fetch(bus);
                self.store(bus, dst, value);
            }

            // INR r / DCR r - 5 states, 10 with memory
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                let value = self.load(bus, dst);
                let result = alu::increment(value);
                self.set_szp_ac(result, result.half_carry);
                self.finish_modify(bus, dst, result.value);
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                let value = self.load(bus, dst);
                let result = alu::decrement(value);
                self.set_szp_ac(result, !result.half_carry);
                self.finish_modify(bus, dst, result.value);
            }

            // LXI rp,imm - 10 states
            0x01 | 0x11 | 0x21 | 0x31 => {
                let value = self.fetch_word(bus);
                self.regs.set_pair(rp, value);
            }

            // DAD rp - 10 states
            0x09 | 0x19 | 0x29 | 0x39 => {
                self.clock.idle(6);
                let sum = u32::from(self.regs.hl()) + u32::from(self.regs.pair(rp));
                self.regs.set_hl(sum as u16);
                self.set_carry(sum > 0xFFFF);
            }

            // INX rp / DCX rp - 5 states
            0x03 | 0x13 | 0x23 | 0x33 => {
                self.clock.idle(1);
                self.regs.set_pair(rp, self.regs.pair(rp).wrapping_add(1));
            }
            0x0B | 0x1B | 0x2B | 0x3B => {
                self.clock.idle(1);
                self.regs.set_pair(rp, self.regs.pair(rp).wrapping_sub(1));
            }

            // STAX / LDAX - 7 states
            0x02 | 0x12 => self.write(bus, self.regs.pair(rp), self.regs.a),
            0x0A | 0x1A => self.regs.a = self.read(bus, self.regs.pair(rp)),

            // SHLD / LHLD - 16 states
            0x22 => {
                let address = self.fetch_word(bus);
                self.write(bus, address, self.regs.l);
                self.write(bus, address.wrapping_add(1), self.regs.h);
            }
            0x2A => {
                let address = self.fetch_word(bus);
                self.regs.l = self.read(bus, address);
                self.regs.h = self.read(bus, address.wrapping_add(1));
            }

            // STA / LDA - 13 states
            0x32 => {
                let address = self.fetch_word(bus);
                self.write(bus, address, self.regs.a);
            }
            0x3A => {
                let address = self.fetch_word(bus);
                self.regs.a = self.read(bus, address);
            }

            // Rotates - CY only
            0x07 => {
                let a = self.regs.a;
                self.regs.a = a.rotate_left(1);
                self.set_carry(a & 0x80 != 0);
            }
            0x0F => {
                let a = self.regs.a;
                self.regs.a = a.rotate_right(1);
                self.set_carry(a & 0x01 != 0);
            }
            0x17 => {
                let result = alu::rotate_left(self.regs.a, self.carry());
                self.regs.a = result.value;
                self.set_carry(result.carry);
            }
            0x1F => {
                let result = alu::rotate_right(self.regs.a, self.carry());
                self.regs.a = result.value;
                self.set_carry(result.carry);
            }

            // DAA
            0x27 => {
                let ac = self.regs.f & ACF != 0;
                let result = alu::decimal_adjust(self.regs.a, ac, self.carry());
                self.regs.a = result.value;
                self.regs.f = flags::szp(result)
                    | if result.half_carry { ACF } else { 0 }
                    | if result.carry { CF } else { 0 };
            }

            // CMA / STC / CMC
            0x2F => self.regs.a = !self.regs.a,
            0x37 => self.regs.f |= CF,
            0x3F => self.regs.f ^= CF,

            // JMP (and alias) - 10 states
            0xC3 | 0xCB => self.regs.pc = self.fetch_word(bus),

            // Jcc - 10 states whether or not taken
            0xC2 | 0xCA | 0xD2 | 0xDA | 0xE2 | 0xEA | 0xF2 | 0xFA => {
                let target = self.fetch_word(bus);
                if self.condition(dst) {
                    self.regs.pc = target;
                }
            }

            // CALL (and aliases) - 17 states
            0xCD | 0xDD | 0xED | 0xFD => {
                self.clock.idle(1);
                let target = self.fetch_word(bus);
                self.call(bus, target);
            }

            // Ccc - 11 states, 17 if taken
            0xC4 | 0xCC | 0xD4 | 0xDC | 0xE4 | 0xEC | 0xF4 | 0xFC => {
                self.clock.idle(1);
                let target = self.fetch_word(bus);
                if self.condition(dst) {
                    self.call(bus, target);
                }
            }

            // RET (and alias) - 10 states
            0xC9 | 0xD9 => self.regs.pc = self.pop(bus),

            // Rcc - 5 states, 11 if taken
            0xC0 | 0xC8 | 0xD0 | 0xD8 | 0xE0 | 0xE8 | 0xF0 | 0xF8 => {
                self.clock.idle(1);
                if self.condition(dst) {
                    self.regs.pc = self.pop(bus);
                }
            }

            // RST n - 11 states
            0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
                self.clock.idle(1);
                self.call(bus, u16::from(opcode & 0x38));
            }

            // PUSH rp - 11 states
            0xC5 | 0xD5 | 0xE5 | 0xF5 => {
                self.clock.idle(1);
                let value = if rp == 3 {
                    self.regs.psw()
                } else {
                    self.regs.pair(rp)
                };
                self.push(bus, value);
            }

            // POP rp - 10 states
            0xC1 | 0xD1 | 0xE1 | 0xF1 => {
                let value = self.pop(bus);
                if rp == 3 {
                    let [f, a] = value.to_le_bytes();
                    self.regs.a = a;
                    self.regs.f = flags::from_byte(f);
                } else {
                    self.regs.set_pair(rp, value);
                }
            }

            // XTHL - 18 states
            0xE3 => {
                let sp = self.regs.sp;
                let lo = self.read(bus, sp);
                let hi = self.read(bus, sp.wrapping_add(1));
                self.clock.idle(2);
                self.write(bus, sp.wrapping_add(1), self.regs.h);
                self.write(bus, sp, self.regs.l);
                self.regs.set_hl(u16::from_le_bytes([lo, hi]));
            }

            // XCHG - 4 states
            0xEB => {
                let de = self.regs.de();
                self.regs.set_de(self.regs.hl());
                self.regs.set_hl(de);
            }

            // PCHL / SPHL - 5 states
            0xE9 => {
                self.clock.idle(1);
                self.regs.pc = self.regs.hl();
            }
            0xF9 => {
                self.clock.idle(1);
                self.regs.sp = self.regs.hl();
            }

            // OUT / IN - 10 states
            0xD3 => {
                let port = self.fetch(bus);
                self.output(bus, port, self.regs.a);
            }
            0xDB => {
                let port = self.fetch(bus);
                self.regs.a = self.input(bus, port);
            }

            // DI / EI - EI takes effect after the next instruction
            0xF3 => self.regs.inte = false,
            0xFB => {
                self.regs.inte = true;
                self.ei_delay = true;
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Read a register field; field 6 reads memory at HL.
    fn load<B: Bus>(&mut self, bus: &mut B, field: u8) -> u8 {
        match field {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            M => self.read(bus, self.regs.hl()),
            _ => self.regs.a,
        }
    }

    /// Write a register field; field 6 writes memory at HL.
    fn store<B: Bus>(&mut self, bus: &mut B, field: u8, value: u8) {
        match field {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            M => self.write(bus, self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    /// Write back an INR/DCR result; register forms spend one extra state.
    fn finish_modify<B: Bus>(&mut self, bus: &mut B, field: u8, value: u8) {
        if field != M {
            self.clock.idle(1);
        }
        self.store(bus, field, value);
    }

    /// ADD ADC SUB SBB ANA XRA ORA CMP, selected by bits 5-3.
    fn arithmetic(&mut self, operation: u8, value: u8) {
        let a = self.regs.a;
        let carry = self.carry();
        let (result, ac, store) = match operation {
            0 | 1 => {
                let result = alu::add(a, value, operation == 1 && carry);
                (result, result.half_carry, true)
            }
            2 | 3 | 7 => {
                let result = alu::subtract(a, value, operation == 3 && carry);
                (result, !result.half_carry, operation != 7)
            }
            4 => (alu::and(a, value), (a | value) & 0x08 != 0, true),
            5 => (alu::xor(a, value), false, true),
            _ => (alu::or(a, value), false, true),
        };
        self.regs.f = flags::szp(result) | if ac { ACF } else { 0 } | if result.carry { CF } else { 0 };
        if store {
            self.regs.a = result.value;
        }
    }

    /// Set S, Z, P and AC, leaving CY alone.
    fn set_szp_ac(&mut self, result: AluResult, ac: bool) {
        self.regs.f = flags::szp(result) | if ac { ACF } else { 0 } | (self.regs.f & CF);
    }

    fn carry(&self) -> bool {
        self.regs.f & CF != 0
    }

    fn set_carry(&mut self, carry: bool) {
        self.regs.f = (self.regs.f & (SF | ZF | ACF | PF)) | ONE | if carry { CF } else { 0 };
    }

    fn call<B: Bus>(&mut self, bus: &mut B, target: u16) {
        self.push(bus, self.regs.pc);
        self.regs.pc = target;
    }

    /// NZ Z NC C PO PE P M, selected by bits 5-3.
    fn condition(&self, condition: u8) -> bool {
        let f = self.regs.f;
        match condition {
            0 => f & ZF == 0,
            1 => f & ZF != 0,
            2 => f & CF == 0,
            3 => f & CF != 0,
            4 => f & PF == 0,
            5 => f & PF != 0,
            6 => f & SF == 0,
            _ => f & SF != 0,
        }
    }
}
