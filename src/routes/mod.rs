// 路由模块
// 每个路由组一个子模块，handler 只做参数校验和结果映射，
// 业务逻辑都在 ClapService 里

pub mod claps;
pub mod health;
