use std::io::Write;

use tracing::debug;

use crate::{
    builtin::Builtin,
    environment::Environment,
    error::{Error, RuntimeError},
    value::Value,
};

use sk_parser::{
    ast::{CallExpression, Expression, ExpressionKind, IdentifierLiteral, Program, Statement},
    span::{Span, WithSpan},
    token::Token,
};

/// Tree-walking evaluator over a borrowed session environment.
pub struct Evaluator<'a> {
    env: &'a mut Environment,
    output: &'a mut dyn Write,
}

impl<'a> Evaluator<'a> {
    pub fn new(env: &'a mut Environment, output: &'a mut dyn Write) -> Self {
        Evaluator { env, output }
    }

    /// Run every statement in order and return the value of the last one, if it produced one.
    /// Stops at the first error; effects of earlier statements are kept.
    pub fn eval(&mut self, prog: &Program) -> Result<Option<Value>, Error> {
        let mut result = None;

        for stmt in &prog.statements {
            result = self.eval_statement(stmt)?;
        }

        Ok(result)
    }

    pub fn eval_statement(&mut self, stmt: &Statement) -> Result<Option<Value>, Error> {
        debug!(statement = %stmt, at = %stmt.span(), "evaluating statement");

        match stmt {
            Statement::Assignment { name, value, .. } => {
                // Only bind once the right-hand side evaluated successfully
                let value = self.eval_expression(value)?;
                self.env.set(name.name.clone(), value);
                Ok(None)
            }
            Statement::Print { argument, .. } => {
                let value = self.eval_expression(argument)?;
                writeln!(self.output, "{}", value)?;
                Ok(None)
            }
            Statement::Expression { expression } => Ok(Some(self.eval_expression(expression)?)),
        }
    }

    fn eval_expression(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExpressionKind::Integer(value) => Ok(Value::Integer(*value)),
            ExpressionKind::Float(value) => Ok(Value::Float(*value)),
            ExpressionKind::String(value) => Ok(Value::String(value.clone())),
            ExpressionKind::Identifier(identifier) => {
                self.eval_identifier_expression(identifier, expr.span)
            }

            ExpressionKind::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right)?;
                self.eval_prefix_expression(&prefix.operator, right)
            }
            ExpressionKind::Infix(infix) => {
                let left = self.eval_expression(&infix.left)?;
                let right = self.eval_expression(&infix.right)?;
                self.eval_infix_expression(&infix.operator, left, right)
            }

            ExpressionKind::Call(call) => self.eval_call_expression(call, expr.span),
        }
    }

    fn eval_identifier_expression(
        &self,
        identifier: &IdentifierLiteral,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        match self.env.get(&identifier.name) {
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::IdentifierNotFound(WithSpan::new(
                identifier.name.clone(),
                span,
            ))),
        }
    }

    fn eval_call_expression(
        &mut self,
        call: &CallExpression,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let builtin = match Builtin::lookup(&call.function.name) {
            Some(builtin) => builtin,
            None => {
                return Err(RuntimeError::FunctionNotFound(WithSpan::new(
                    call.function.name.clone(),
                    span,
                )))
            }
        };

        let args = call
            .arguments
            .iter()
            .map(|arg| self.eval_expression(arg))
            .collect::<Result<Vec<Value>, RuntimeError>>()?;

        builtin.apply(args, span)
    }

    fn eval_prefix_expression(
        &self,
        operator: &WithSpan<Token>,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        match (&operator.value, right) {
            (Token::Minus, Value::Integer(value)) => value
                .checked_neg()
                .map(Value::Integer)
                .ok_or_else(|| RuntimeError::IntegerOverflow(operator.clone())),
            (Token::Minus, Value::Float(value)) => Ok(Value::Float(-value)),
            (_, right) => Err(RuntimeError::InvalidPrefixOperandType(
                operator.clone(),
                right,
            )),
        }
    }

    fn eval_infix_expression(
        &self,
        operator: &WithSpan<Token>,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        match (&left, &right) {
            (Value::Integer(left_value), Value::Integer(right_value)) => {
                self.eval_integer_infix_expression(operator, *left_value, *right_value)
            }

            (Value::Float(left_value), Value::Float(right_value)) => {
                self.eval_float_infix_expression(operator, *left_value, *right_value)
            }
            (Value::Float(left_value), Value::Integer(right_value)) => {
                self.eval_float_infix_expression(operator, *left_value, *right_value as f64)
            }
            (Value::Integer(left_value), Value::Float(right_value)) => {
                self.eval_float_infix_expression(operator, *left_value as f64, *right_value)
            }

            (Value::String(left_value), Value::String(right_value))
                if operator.value == Token::Plus =>
            {
                Ok(Value::String(left_value.to_owned() + right_value))
            }

            (_, _) => Err(RuntimeError::InvalidInfixOperandType(
                operator.clone(),
                left,
                right,
            )),
        }
    }

    fn eval_integer_infix_expression(
        &self,
        operator: &WithSpan<Token>,
        left_value: i64,
        right_value: i64,
    ) -> Result<Value, RuntimeError> {
        let result = match operator.value {
            Token::Plus => left_value.checked_add(right_value),
            Token::Minus => left_value.checked_sub(right_value),
            Token::Star => left_value.checked_mul(right_value),
            // True division always produces a float
            Token::Slash => {
                return self.eval_float_infix_expression(
                    operator,
                    left_value as f64,
                    right_value as f64,
                )
            }
            _ => {
                return Err(RuntimeError::InvalidInfixOperandType(
                    operator.clone(),
                    Value::Integer(left_value),
                    Value::Integer(right_value),
                ))
            }
        };

        result
            .map(Value::Integer)
            .ok_or_else(|| RuntimeError::IntegerOverflow(operator.clone()))
    }

    fn eval_float_infix_expression(
        &self,
        operator: &WithSpan<Token>,
        left_value: f64,
        right_value: f64,
    ) -> Result<Value, RuntimeError> {
        match operator.value {
            Token::Plus => Ok(Value::Float(left_value + right_value)),
            Token::Minus => Ok(Value::Float(left_value - right_value)),
            Token::Star => Ok(Value::Float(left_value * right_value)),
            Token::Slash if right_value == 0.0 => {
                Err(RuntimeError::DivisionByZero(operator.clone()))
            }
            Token::Slash => Ok(Value::Float(left_value / right_value)),

            _ => Err(RuntimeError::InvalidInfixOperandType(
                operator.clone(),
                Value::Float(left_value),
                Value::Float(right_value),
            )),
        }
    }
}
