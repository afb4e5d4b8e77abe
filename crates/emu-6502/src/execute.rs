//! Shared execution driver for every 6502 variant.

use emu_core::{AluResult, Bus, DecimalQuirks, alu};

use crate::addressing::Operand;
use crate::cpu::{IRQ_VECTOR, RunState};
use crate::decode::{Condition, Instruction, Kind, Mode, Op};
use crate::flags::{C, D, I, N, V, Z};
use crate::variant::{ModifyWrite, Variant};
use crate::{Mos6502, Status};

/// Constant ANE and LXA OR into A before masking. It varies between chips
/// and with temperature; $EE is the most common value.
const UNSTABLE_MAGIC: u8 = 0xEE;

/// Turn a borrow-out into the 6502's inverted carry.
const fn borrow_to_carry(result: AluResult) -> AluResult {
    AluResult {
        carry: !result.carry,
        ..result
    }
}

impl<V: Variant> Mos6502<V> {
    /// Execute the instruction whose opcode has just been fetched.
    pub(crate) fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8) {
        let Instruction { op, mode, fixup } = V::decode(opcode);
        match op.kind() {
            Kind::Read => {
                let value = match mode {
                    Mode::Bare => return,
                    Mode::Implied => {
                        self.dummy_read(bus, self.regs.pc);
                        return;
                    }
                    Mode::Immediate => self.fetch(bus),
                    _ => {
                        let operand = self.resolve(bus, mode, fixup);
                        self.read(bus, operand.address)
                    }
                };
                self.read_op(bus, op, mode, value);
            }
            Kind::Write => {
                let operand = self.resolve(bus, mode, fixup);
                let (address, value) = self.store_value(op, operand);
                self.write(bus, address, value);
            }
            Kind::Modify => {
                if mode == Mode::Accumulator {
                    self.dummy_read(bus, self.regs.pc);
                    self.regs.a = self.modify_op(bus, op, self.regs.a);
                    return;
                }
                let address = self.resolve(bus, mode, fixup).address;
                let original = self.read_modify(bus, address);
                match V::modify_write_order() {
                    ModifyWrite::WriteOriginal => self.write(bus, address, original),
                    ModifyWrite::RereadOriginal => self.dummy_read(bus, address),
                }
                let modified = self.modify_op(bus, op, original);
                self.write(bus, address, modified);
            }
            Kind::Implied => {
                self.dummy_read(bus, self.regs.pc);
                self.implied_op(op);
            }
            Kind::Control => self.control(bus, op, mode),
        }
    }

    // =========================================================================
    // Operation groups
    // =========================================================================

    fn read_op<B: Bus>(&mut self, bus: &mut B, op: Op, mode: Mode, value: u8) {
        match op {
            Op::Lda => self.set_a(value),
            Op::Ldx => self.set_x(value),
            Op::Ldy => self.set_y(value),
            Op::Lax => {
                self.regs.x = value;
                self.set_a(value);
            }
            Op::Adc => self.adc(bus, value),
            Op::Sbc => self.sbc(bus, value),
            Op::And => self.set_a(self.regs.a & value),
            Op::Ora => self.set_a(self.regs.a | value),
            Op::Eor => self.set_a(self.regs.a ^ value),
            Op::Cmp => self.compare(self.regs.a, value),
            Op::Cpx => self.compare(self.regs.x, value),
            Op::Cpy => self.compare(self.regs.y, value),
            Op::Bit => {
                self.regs.p.set_if(Z, self.regs.a & value == 0);
                // BIT #nn (65C02) only affects Z
                if mode != Mode::Immediate {
                    self.regs.p.set_if(N, value & 0x80 != 0);
                    self.regs.p.set_if(V, value & 0x40 != 0);
                }
            }
            Op::Nop => {}
            Op::Anc => {
                self.set_a(self.regs.a & value);
                self.regs.p.set_if(C, self.regs.a & 0x80 != 0);
            }
            Op::Alr => {
                let result = alu::shift_right(self.regs.a & value);
                self.regs.p.apply(result, N | Z | C);
                self.regs.a = result.value;
            }
            Op::Arr => self.arr(value),
            Op::Ane => self.set_a((self.regs.a | UNSTABLE_MAGIC) & self.regs.x & value),
            Op::Lxa => {
                let result = (self.regs.a | UNSTABLE_MAGIC) & value;
                self.regs.x = result;
                self.set_a(result);
            }
            Op::Sbx => {
                let result = borrow_to_carry(alu::compare(self.regs.a & self.regs.x, value));
                self.regs.p.apply(result, N | Z | C);
                self.regs.x = result.value;
            }
            Op::Las => {
                let result = value & self.regs.s;
                self.regs.s = result;
                self.regs.x = result;
                self.set_a(result);
            }
            _ => unreachable!("{op:?} is not a read"),
        }
    }

    /// Address and value written by a store.
    fn store_value(&mut self, op: Op, operand: Operand) -> (u16, u8) {
        // SHA/SHX/SHY/TAS AND the value with the base high byte plus one; on
        // a page cross that value also replaces the target's high byte.
        let high = ((operand.base >> 8) as u8).wrapping_add(1);
        let unstable = |value: u8| {
            let value = value & high;
            let address = if operand.crossed {
                (u16::from(value) << 8) | (operand.address & 0x00FF)
            } else {
                operand.address
            };
            (address, value)
        };

        match op {
            Op::Sta => (operand.address, self.regs.a),
            Op::Stx => (operand.address, self.regs.x),
            Op::Sty => (operand.address, self.regs.y),
            Op::Stz => (operand.address, 0),
            Op::Sax => (operand.address, self.regs.a & self.regs.x),
            Op::Sha => unstable(self.regs.a & self.regs.x),
            Op::Shx => unstable(self.regs.x),
            Op::Shy => unstable(self.regs.y),
            Op::Tas => {
                self.regs.s = self.regs.a & self.regs.x;
                unstable(self.regs.s)
            }
            _ => unreachable!("{op:?} is not a store"),
        }
    }

    /// Compute the value written back by a read-modify-write.
    fn modify_op<B: Bus>(&mut self, bus: &mut B, op: Op, value: u8) -> u8 {
        match op {
            Op::Asl | Op::Lsr | Op::Rol | Op::Ror => self.shift(op, value),
            Op::Inc => {
                let result = value.wrapping_add(1);
                self.regs.p.update_nz(result);
                result
            }
            Op::Dec => {
                let result = value.wrapping_sub(1);
                self.regs.p.update_nz(result);
                result
            }
            Op::Tsb => {
                self.regs.p.set_if(Z, self.regs.a & value == 0);
                value | self.regs.a
            }
            Op::Trb => {
                self.regs.p.set_if(Z, self.regs.a & value == 0);
                value & !self.regs.a
            }
            Op::Rmb(bit) => value & !(1 << bit),
            Op::Smb(bit) => value | (1 << bit),
            Op::Slo => {
                let result = self.shift(Op::Asl, value);
                self.set_a(self.regs.a | result);
                result
            }
            Op::Rla => {
                let result = self.shift(Op::Rol, value);
                self.set_a(self.regs.a & result);
                result
            }
            Op::Sre => {
                let result = self.shift(Op::Lsr, value);
                self.set_a(self.regs.a ^ result);
                result
            }
            Op::Rra => {
                let result = self.shift(Op::Ror, value);
                self.adc(bus, result);
                result
            }
            Op::Dcp => {
                let result = value.wrapping_sub(1);
                self.compare(self.regs.a, result);
                result
            }
            Op::Isc => {
                let result = value.wrapping_add(1);
                self.sbc(bus, result);
                result
            }
            _ => unreachable!("{op:?} is not a read-modify-write"),
        }
    }

    fn implied_op(&mut self, op: Op) {
        match op {
            Op::Tax => self.set_x(self.regs.a),
            Op::Tay => self.set_y(self.regs.a),
            Op::Txa => self.set_a(self.regs.x),
            Op::Tya => self.set_a(self.regs.y),
            Op::Tsx => self.set_x(self.regs.s),
            Op::Txs => self.regs.s = self.regs.x,
            Op::Inx => self.set_x(self.regs.x.wrapping_add(1)),
            Op::Iny => self.set_y(self.regs.y.wrapping_add(1)),
            Op::Dex => self.set_x(self.regs.x.wrapping_sub(1)),
            Op::Dey => self.set_y(self.regs.y.wrapping_sub(1)),
            Op::Clc => self.regs.p.clear(C),
            Op::Sec => self.regs.p.set(C),
            Op::Cli => self.regs.p.clear(I),
            Op::Sei => self.regs.p.set(I),
            Op::Cld => self.regs.p.clear(D),
            Op::Sed => self.regs.p.set(D),
            Op::Clv => self.regs.p.clear(V),
            _ => unreachable!("{op:?} is not implied"),
        }
    }

    fn control<B: Bus>(&mut self, bus: &mut B, op: Op, mode: Mode) {
        match op {
            // BRK - 7 cycles, skips a padding byte
            Op::Brk => {
                let _ = self.fetch(bus);
                self.push_return_state(bus, self.regs.p.to_byte_brk());
                self.regs.pc = self.read_vector(bus, IRQ_VECTOR);
            }

            // JSR abs - 6 cycles; pushes the address of its last byte
            Op::Jsr => {
                let lo = self.fetch(bus);
                self.dummy_read(bus, self.regs.stack_addr());
                let [pcl, pch] = self.regs.pc.to_le_bytes();
                self.push(bus, pch);
                self.push(bus, pcl);
                let hi = self.read(bus, self.regs.pc);
                self.regs.pc = u16::from_le_bytes([lo, hi]);
            }

            // RTS - 6 cycles
            Op::Rts => {
                self.dummy_read(bus, self.regs.pc);
                self.dummy_read(bus, self.regs.stack_addr());
                let lo = self.pull(bus);
                let hi = self.pull(bus);
                self.regs.pc = u16::from_le_bytes([lo, hi]);
                let _ = self.fetch(bus);
            }

            // RTI - 6 cycles
            Op::Rti => {
                self.dummy_read(bus, self.regs.pc);
                self.dummy_read(bus, self.regs.stack_addr());
                let p = self.pull(bus);
                self.regs.p = Status::from_byte(p);
                let lo = self.pull(bus);
                let hi = self.pull(bus);
                self.regs.pc = u16::from_le_bytes([lo, hi]);
            }

            // PHA/PHP/PHX/PHY - 3 cycles
            Op::Pha | Op::Php | Op::Phx | Op::Phy => {
                self.dummy_read(bus, self.regs.pc);
                let value = match op {
                    Op::Pha => self.regs.a,
                    Op::Php => self.regs.p.to_byte_brk(),
                    Op::Phx => self.regs.x,
                    _ => self.regs.y,
                };
                self.push(bus, value);
            }

            // PLA/PLP/PLX/PLY - 4 cycles
            Op::Pla | Op::Plp | Op::Plx | Op::Ply => {
                self.dummy_read(bus, self.regs.pc);
                self.dummy_read(bus, self.regs.stack_addr());
                let value = self.pull(bus);
                match op {
                    Op::Pla => self.set_a(value),
                    Op::Plp => self.regs.p = Status::from_byte(value),
                    Op::Plx => self.set_x(value),
                    _ => self.set_y(value),
                }
            }

            // JMP abs - 3, JMP (abs) - 5 (6 on 65C02), JMP (abs,X) - 6
            Op::Jmp => self.regs.pc = self.jump_target(bus, mode),

            // Bxx rel - 2/3/4 cycles
            Op::Branch(condition) => {
                let taken = self.condition(condition);
                self.branch(bus, taken);
            }
            Op::Bra => self.branch(bus, true),

            // BBRn/BBSn zp,rel - 5/6/7 cycles
            Op::Bbr(bit) | Op::Bbs(bit) => {
                let address = u16::from(self.fetch(bus));
                let value = self.read(bus, address);
                self.dummy_read(bus, address);
                let set = value & (1 << bit) != 0;
                self.branch(bus, set == matches!(op, Op::Bbs(_)));
            }

            // 65C02 $5C - 8 cycles
            Op::SlowNop => {
                let lo = self.fetch(bus);
                let _ = self.fetch(bus);
                self.dummy_read(bus, 0xFF00 | u16::from(lo));
                for _ in 0..4 {
                    self.dummy_read(bus, 0xFFFF);
                }
            }

            // WAI/STP - 3 cycles, then asleep
            Op::Wai | Op::Stp => {
                self.dummy_read(bus, self.regs.pc);
                self.dummy_read(bus, self.regs.pc);
                self.run = if op == Op::Wai {
                    RunState::Waiting
                } else {
                    log::warn!("{} stopped at ${:04X}", V::NAME, self.regs.pc.wrapping_sub(1));
                    RunState::Stopped
                };
            }

            // JAM - the bus settles into reading $FFFF/$FFFE until reset
            Op::Jam => {
                self.dummy_read(bus, self.regs.pc);
                self.dummy_read(bus, 0xFFFF);
                self.dummy_read(bus, 0xFFFE);
                self.dummy_read(bus, 0xFFFE);
                log::warn!("{} jammed at ${:04X}", V::NAME, self.regs.pc.wrapping_sub(1));
                self.run = RunState::Jammed;
            }

            _ => unreachable!("{op:?} is not a control instruction"),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn set_a(&mut self, value: u8) {
        self.regs.a = value;
        self.regs.p.update_nz(value);
    }

    fn set_x(&mut self, value: u8) {
        self.regs.x = value;
        self.regs.p.update_nz(value);
    }

    fn set_y(&mut self, value: u8) {
        self.regs.y = value;
        self.regs.p.update_nz(value);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let result = borrow_to_carry(alu::compare(register, value));
        self.regs.p.apply(result, N | Z | C);
    }

    fn shift(&mut self, op: Op, value: u8) -> u8 {
        let carry = self.regs.p.is_set(C);
        let result = match op {
            Op::Asl => alu::shift_left(value),
            Op::Lsr => alu::shift_right(value),
            Op::Rol => alu::rotate_left(value, carry),
            _ => alu::rotate_right(value, carry),
        };
        self.regs.p.apply(result, N | Z | C);
        result.value
    }

    /// Active decimal behaviour: D set and the chip has a decimal adder.
    fn decimal_quirks(&self) -> Option<DecimalQuirks> {
        if self.regs.p.is_set(D) {
            V::decimal_mode_quirks()
        } else {
            None
        }
    }

    fn adc<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let carry = self.regs.p.is_set(C);
        let result = match self.decimal_quirks() {
            Some(quirks) => {
                let result = alu::add_decimal(self.regs.a, value, carry, quirks);
                self.decimal_cycle(bus, quirks);
                result
            }
            None => alu::add(self.regs.a, value, carry),
        };
        self.regs.p.apply(result, N | V | Z | C);
        self.regs.a = result.value;
    }

    fn sbc<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let borrow = !self.regs.p.is_set(C);
        let result = match self.decimal_quirks() {
            Some(quirks) => {
                let result = alu::subtract_decimal(self.regs.a, value, borrow, quirks);
                self.decimal_cycle(bus, quirks);
                result
            }
            None => alu::subtract(self.regs.a, value, borrow),
        };
        self.regs.p.apply(borrow_to_carry(result), N | V | Z | C);
        self.regs.a = result.value;
    }

    /// The 65C02 spends one more cycle fixing up N and Z in decimal mode.
    fn decimal_cycle<B: Bus>(&mut self, bus: &mut B, quirks: DecimalQuirks) {
        if quirks == DecimalQuirks::Cmos {
            self.repeat_last(bus);
        }
    }

    fn arr(&mut self, value: u8) {
        let t = self.regs.a & value;
        let carry_in = self.regs.p.is_set(C);
        let mut result = (t >> 1) | (u8::from(carry_in) << 7);

        if self.decimal_quirks().is_some() {
            self.regs.p.set_if(N, carry_in);
            self.regs.p.set_if(Z, result == 0);
            self.regs.p.set_if(V, (t ^ result) & 0x40 != 0);
            let (hi, lo) = (t >> 4, t & 0x0F);
            if lo + (lo & 1) > 5 {
                result = (result & 0xF0) | (result.wrapping_add(6) & 0x0F);
            }
            let carry = hi + (hi & 1) > 5;
            self.regs.p.set_if(C, carry);
            if carry {
                result = result.wrapping_add(0x60);
            }
        } else {
            self.regs.p.update_nz(result);
            self.regs.p.set_if(C, result & 0x40 != 0);
            self.regs.p.set_if(V, ((result >> 6) ^ (result >> 5)) & 1 != 0);
        }
        self.regs.a = result;
    }

    fn condition(&self, condition: Condition) -> bool {
        let p = self.regs.p;
        match condition {
            Condition::Plus => !p.is_set(N),
            Condition::Minus => p.is_set(N),
            Condition::OverflowClear => !p.is_set(V),
            Condition::OverflowSet => p.is_set(V),
            Condition::CarryClear => !p.is_set(C),
            Condition::CarrySet => p.is_set(C),
            Condition::NotEqual => !p.is_set(Z),
            Condition::Equal => p.is_set(Z),
        }
    }

    /// Fetch a branch offset and take it if asked: +1 cycle when taken,
    /// +1 more when the target is on another page.
    fn branch<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let offset = self.fetch(bus) as i8;
        if !taken {
            return;
        }
        self.dummy_read(bus, self.regs.pc);
        let target = self.regs.pc.wrapping_add_signed(i16::from(offset));
        if (target ^ self.regs.pc) & 0xFF00 != 0 {
            self.dummy_read(bus, (self.regs.pc & 0xFF00) | (target & 0x00FF));
        }
        self.regs.pc = target;
    }
}
