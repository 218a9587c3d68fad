//! Scalar evaluation for the bytecode evaluator.
//!
//! A stack-based virtual machine executes the instruction tape. The compiler
//! has already validated every stack access, so the hot loop uses plain `Vec`
//! operations and a single dispatch match.

use super::{CompiledEvaluator, Instruction};

impl CompiledEvaluator {
    /// Evaluate at a single point, with no tree traversal.
    ///
    /// `params` holds the parameter values in `param_names()` order. Points
    /// where the expression is undefined follow IEEE 754 arithmetic, so
    /// `ln(-1)` comes back as `NaN` and `1 / 0` as an infinity; no error is
    /// raised here.
    ///
    /// # Panics
    ///
    /// Panics on stack underflow, which indicates a compiler bug.
    ///
    /// # Example
    ///
    /// ```
    /// use gradviz::{parse, CompiledEvaluator};
    ///
    /// let expr = parse("x^2 + 1").unwrap();
    /// let eval = CompiledEvaluator::compile_auto(&expr).unwrap();
    /// assert!((eval.evaluate(&[3.0]) - 10.0).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn evaluate(&self, params: &[f64]) -> f64 {
        let mut stack: Vec<f64> = Vec::with_capacity(self.stack_size);
        self.evaluate_with_stack(params, &mut stack)
    }

    /// Evaluate reusing an existing stack buffer.
    ///
    /// Grid sampling calls this in a loop so the buffer is allocated once.
    #[inline]
    pub fn evaluate_with_stack(&self, params: &[f64], stack: &mut Vec<f64>) -> f64 {
        stack.clear();

        for instr in self.instructions.iter() {
            match *instr {
                Instruction::LoadConst(idx) => stack.push(self.constants[idx as usize]),
                Instruction::LoadParam(idx) => stack.push(params[idx as usize]),

                Instruction::Add => {
                    let b = stack.pop().unwrap();
                    *stack.last_mut().unwrap() += b;
                }
                Instruction::Sub => {
                    let b = stack.pop().unwrap();
                    *stack.last_mut().unwrap() -= b;
                }
                Instruction::Mul => {
                    let b = stack.pop().unwrap();
                    *stack.last_mut().unwrap() *= b;
                }
                Instruction::Div => {
                    let b = stack.pop().unwrap();
                    *stack.last_mut().unwrap() /= b;
                }
                Instruction::Neg => {
                    let top = stack.last_mut().unwrap();
                    *top = -*top;
                }
                Instruction::Pow => {
                    let exp = stack.pop().unwrap();
                    let base = stack.last_mut().unwrap();
                    *base = base.powf(exp);
                }

                Instruction::Call { eval, argc } => {
                    let split = stack.len() - argc as usize;
                    let value = eval(&stack[split..]).unwrap_or(f64::NAN);
                    stack.truncate(split);
                    stack.push(value);
                }
            }
        }
        stack.pop().unwrap_or(f64::NAN)
    }
}
