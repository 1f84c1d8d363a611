use mysql_async::Value as MySqlValue;
use mysql_common::params::Params;

pub struct MySqlParamStore {
    pub params: Vec<MySqlValue>,
}

impl MySqlParamStore {
    pub fn from_values(values: &[u64]) -> Self {
        let params = values.iter().map(|v| MySqlValue::UInt(*v)).collect();
        MySqlParamStore { params }
    }

    pub fn params(&self) -> Params {
        if self.params.is_empty() {
            return Params::Empty;
        }
        Params::Positional(self.params.clone())
    }
}
